//! One dwelling unit's telemetry record.

/// One flat's telemetry: a device id and four consumption readings.
///
/// Fields are string-encoded at the managed-object boundary and stored
/// without validation; completeness is checked by [`Flat::is_valid`] before
/// the flat is admitted into the apartment's table. The field order of
/// [`Flat::row`] is the five-column wire contract and must not change.
#[derive(Debug, Clone, Default)]
pub struct Flat {
    device_id: Option<String>,
    consumption: Option<String>,
    consumption_heating_cooling: Option<String>,
    consumption_lighting: Option<String>,
    consumption_misc: Option<String>,
}

impl Flat {
    /// Creates an empty flat with no readings set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flat's device id (natural key within an apartment).
    pub fn set_device_id(&mut self, value: impl Into<String>) {
        self.device_id = Some(value.into());
    }

    /// Sets total energy consumption.
    pub fn set_consumption(&mut self, value: impl Into<String>) {
        self.consumption = Some(value.into());
    }

    /// Sets energy consumption by heating and cooling.
    pub fn set_consumption_heating_cooling(&mut self, value: impl Into<String>) {
        self.consumption_heating_cooling = Some(value.into());
    }

    /// Sets energy consumption by lighting.
    pub fn set_consumption_lighting(&mut self, value: impl Into<String>) {
        self.consumption_lighting = Some(value.into());
    }

    /// Sets energy consumption by miscellaneous loads.
    pub fn set_consumption_misc(&mut self, value: impl Into<String>) {
        self.consumption_misc = Some(value.into());
    }

    /// Returns the device id, if set.
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    /// Returns `true` iff all five readings are set.
    pub fn is_valid(&self) -> bool {
        self.device_id.is_some()
            && self.consumption.is_some()
            && self.consumption_heating_cooling.is_some()
            && self.consumption_lighting.is_some()
            && self.consumption_misc.is_some()
    }

    /// Returns the five cell values in fixed column order.
    ///
    /// # Panics
    ///
    /// Panics if the flat is incomplete; callers must check
    /// [`Flat::is_valid`] first.
    pub fn row(&self) -> Vec<String> {
        let cell = |field: &Option<String>| {
            field
                .clone()
                .expect("row() requires a complete flat; check is_valid() first")
        };
        vec![
            cell(&self.device_id),
            cell(&self.consumption),
            cell(&self.consumption_heating_cooling),
            cell(&self.consumption_lighting),
            cell(&self.consumption_misc),
        ]
    }
}
