//! City inventories and their entries.
//!
//! An [`InventoryEntry`] collects the activity records reported under one
//! GPC reference number and keeps their emissions up to date: every change
//! to an activity, the factor selection or the GWP set recomputes the
//! affected results before returning, so [`InventoryEntry::total_co2e_kg`]
//! always equals the GWP-weighted sum of the entry's gas amounts.
//!
//! Mutations are all-or-nothing. If a recomputation fails the entry is left
//! exactly as it was.

use crate::activity::ActivityRecord;
use crate::aggregate::EmissionsResult;
use crate::decimal;
use crate::emission_factor::EmissionFactor;
use crate::engine::EmissionsEngine;
use crate::errors::{CalculationError, CalculationResult};
use crate::gas::{Gas, GwpSet};
use crate::gpc::{GpcReference, Scope, Sector};
use crate::methodology::METHODOLOGY_REGISTRY;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Activity records and emissions under one GPC reference number.
#[derive(Debug, Clone)]
pub struct InventoryEntry {
    gpc_reference: GpcReference,
    methodology: String,
    engine: Arc<EmissionsEngine>,
    factors: Vec<EmissionFactor>,
    activities: BTreeMap<String, ActivityRecord>,
    results: BTreeMap<String, EmissionsResult>,
    total_co2e_kg: Decimal,
}

impl InventoryEntry {
    /// Creates an empty entry.
    ///
    /// # Errors
    ///
    /// `InvalidGpcReference` or `UnknownMethodology` if the methodology is not
    /// registered for the reference number.
    pub fn new(
        gpc_reference_number: &str,
        methodology: &str,
        engine: Arc<EmissionsEngine>,
    ) -> CalculationResult<Self> {
        let gpc_reference = GpcReference::parse(gpc_reference_number)?;
        METHODOLOGY_REGISTRY.lookup(methodology, gpc_reference_number)?;
        Ok(Self {
            gpc_reference,
            methodology: methodology.to_string(),
            engine,
            factors: Vec::new(),
            activities: BTreeMap::new(),
            results: BTreeMap::new(),
            total_co2e_kg: Decimal::ZERO,
        })
    }

    pub fn gpc_reference(&self) -> GpcReference {
        self.gpc_reference
    }

    pub fn methodology(&self) -> &str {
        &self.methodology
    }

    pub fn sector(&self) -> Sector {
        self.gpc_reference.sector
    }

    pub fn scope(&self) -> Option<Scope> {
        self.gpc_reference.scope()
    }

    pub fn gwp_set(&self) -> GwpSet {
        self.engine.gwp_set()
    }

    /// The emission factors currently selected for this entry.
    pub fn factors(&self) -> &[EmissionFactor] {
        &self.factors
    }

    pub fn activities(&self) -> &BTreeMap<String, ActivityRecord> {
        &self.activities
    }

    pub fn activity(&self, id: &str) -> Option<&ActivityRecord> {
        self.activities.get(id)
    }

    /// Emissions of one activity record.
    pub fn result(&self, id: &str) -> Option<&EmissionsResult> {
        self.results.get(id)
    }

    pub fn results(&self) -> impl Iterator<Item = (&str, &EmissionsResult)> {
        self.results.iter().map(|(id, r)| (id.as_str(), r))
    }

    /// The cached CO2e total of every activity in this entry, kg.
    pub fn total_co2e_kg(&self) -> Decimal {
        self.total_co2e_kg
    }

    /// Physical mass per gas summed over all activities, kg.
    ///
    /// A gas appears only if at least one activity produced an amount for it.
    pub fn gas_totals_kg(&self) -> CalculationResult<BTreeMap<Gas, Decimal>> {
        let mut totals = BTreeMap::new();
        for result in self.results.values() {
            for (&gas, breakdown) in &result.per_gas {
                let total = totals.entry(gas).or_insert(Decimal::ZERO);
                *total = decimal::sum([*total, breakdown.mass_kg], "gas total")?;
            }
        }
        Ok(totals)
    }

    /// Gases the methodology covers that were omitted for at least one
    /// activity.
    pub fn omitted_gases(&self) -> Vec<Gas> {
        Gas::ALL
            .into_iter()
            .filter(|gas| {
                self.results
                    .values()
                    .any(|r| r.omitted_gases.contains(gas))
            })
            .collect()
    }

    /// Adds or replaces an activity record and recomputes its emissions.
    pub fn upsert_activity(
        &mut self,
        id: &str,
        activity: ActivityRecord,
    ) -> CalculationResult<&EmissionsResult> {
        let result = self.calculate(&activity)?;
        let mut results = self.results.clone();
        results.insert(id.to_string(), result);
        let total = total_of(&results)?;

        self.activities.insert(id.to_string(), activity);
        self.results = results;
        self.total_co2e_kg = total;
        debug!(
            gpc_reference = %self.gpc_reference,
            activity = id,
            total_co2e_kg = %self.total_co2e_kg,
            "Upserted activity"
        );
        Ok(&self.results[id])
    }

    /// Removes an activity record; its emissions leave the total.
    pub fn remove_activity(&mut self, id: &str) -> CalculationResult<Option<ActivityRecord>> {
        if !self.activities.contains_key(id) {
            return Ok(None);
        }
        let mut results = self.results.clone();
        results.remove(id);
        let total = total_of(&results)?;

        self.results = results;
        self.total_co2e_kg = total;
        Ok(self.activities.remove(id))
    }

    /// Replaces the emission factor selection and recomputes every activity.
    pub fn set_factors(&mut self, factors: Vec<EmissionFactor>) -> CalculationResult<()> {
        let previous = std::mem::replace(&mut self.factors, factors);
        match self.recalculate_all() {
            Ok((results, total)) => {
                self.results = results;
                self.total_co2e_kg = total;
                Ok(())
            }
            Err(e) => {
                self.factors = previous;
                Err(e)
            }
        }
    }

    /// Switches the GWP set. Gas masses are unchanged; only the CO2e
    /// weighting is redone.
    pub fn set_gwp_set(&mut self, gwp_set: GwpSet) -> CalculationResult<()> {
        if gwp_set == self.gwp_set() {
            return Ok(());
        }
        let results = self
            .results
            .iter()
            .map(|(id, r)| Ok((id.clone(), r.with_gwp_set(gwp_set)?)))
            .collect::<CalculationResult<BTreeMap<_, _>>>()?;
        let total = total_of(&results)?;

        self.engine = Arc::new(self.engine.as_ref().clone().with_gwp_set(gwp_set));
        self.results = results;
        self.total_co2e_kg = total;
        Ok(())
    }

    fn calculate(&self, activity: &ActivityRecord) -> CalculationResult<EmissionsResult> {
        self.engine.calculate(
            activity,
            &self.methodology,
            &self.gpc_reference.to_string(),
            &self.factors,
        )
    }

    fn recalculate_all(&self) -> CalculationResult<(BTreeMap<String, EmissionsResult>, Decimal)> {
        let results = self
            .activities
            .iter()
            .map(|(id, activity)| Ok((id.clone(), self.calculate(activity)?)))
            .collect::<CalculationResult<BTreeMap<_, _>>>()?;
        let total = total_of(&results)?;
        Ok((results, total))
    }
}

fn total_of(results: &BTreeMap<String, EmissionsResult>) -> CalculationResult<Decimal> {
    decimal::sum(results.values().map(|r| r.total_co2e_kg), "entry total")
}

/// One city's inventory for one reporting year.
#[derive(Debug, Clone)]
pub struct Inventory {
    pub city: String,
    pub year: u16,
    engine: Arc<EmissionsEngine>,
    entries: BTreeMap<GpcReference, InventoryEntry>,
}

impl Inventory {
    #[must_use]
    pub fn new(city: &str, year: u16, engine: EmissionsEngine) -> Self {
        Self {
            city: city.to_string(),
            year,
            engine: Arc::new(engine),
            entries: BTreeMap::new(),
        }
    }

    pub fn gwp_set(&self) -> GwpSet {
        self.engine.gwp_set()
    }

    /// Adds an entry for `gpc_reference_number`, or returns the existing one.
    ///
    /// # Errors
    ///
    /// `Config` if an entry already exists under a different methodology.
    pub fn entry_or_insert(
        &mut self,
        gpc_reference_number: &str,
        methodology: &str,
    ) -> CalculationResult<&mut InventoryEntry> {
        let reference = GpcReference::parse(gpc_reference_number)?;
        if let Some(existing) = self.entries.get(&reference) {
            if existing.methodology() != methodology {
                return Err(CalculationError::Config(format!(
                    "{reference} already uses methodology '{}'",
                    existing.methodology()
                )));
            }
        } else {
            let entry =
                InventoryEntry::new(gpc_reference_number, methodology, self.engine.clone())?;
            self.entries.insert(reference, entry);
        }
        self.entry_mut(&reference)
            .ok_or_else(|| CalculationError::InvalidGpcReference(reference.to_string()))
    }

    pub fn entry(&self, reference: &GpcReference) -> Option<&InventoryEntry> {
        self.entries.get(reference)
    }

    pub fn entry_mut(&mut self, reference: &GpcReference) -> Option<&mut InventoryEntry> {
        self.entries.get_mut(reference)
    }

    pub fn remove_entry(&mut self, reference: &GpcReference) -> Option<InventoryEntry> {
        self.entries.remove(reference)
    }

    /// Entries in GPC order.
    pub fn entries(&self) -> impl Iterator<Item = &InventoryEntry> {
        self.entries.values()
    }

    /// Switches every entry to `gwp_set`. Either all entries switch or none.
    pub fn set_gwp_set(&mut self, gwp_set: GwpSet) -> CalculationResult<()> {
        let mut entries = self.entries.clone();
        for entry in entries.values_mut() {
            entry.set_gwp_set(gwp_set)?;
        }
        self.entries = entries;
        self.engine = Arc::new(self.engine.as_ref().clone().with_gwp_set(gwp_set));
        Ok(())
    }

    pub fn total_co2e_kg(&self) -> CalculationResult<Decimal> {
        decimal::sum(self.entries().map(InventoryEntry::total_co2e_kg), "inventory total")
    }

    /// CO2e per sector, kg. Sectors without entries are absent.
    pub fn totals_by_sector(&self) -> CalculationResult<BTreeMap<Sector, Decimal>> {
        self.totals_by(|entry| Some(entry.sector()))
    }

    /// CO2e per scope, kg. Entries whose reference implies no scope are
    /// left out.
    pub fn totals_by_scope(&self) -> CalculationResult<BTreeMap<Scope, Decimal>> {
        self.totals_by(InventoryEntry::scope)
    }

    fn totals_by<K: Ord>(
        &self,
        key: impl Fn(&InventoryEntry) -> Option<K>,
    ) -> CalculationResult<BTreeMap<K, Decimal>> {
        let mut totals = BTreeMap::new();
        for entry in self.entries() {
            let Some(k) = key(entry) else { continue };
            let total = totals.entry(k).or_insert(Decimal::ZERO);
            *total = decimal::sum([*total, entry.total_co2e_kg()], "inventory subtotal")?;
        }
        Ok(totals)
    }
}
