use std::sync::RwLock;

use crate::error::Result;
use crate::keeper::expected::ParamsKeeper;
use crate::types::Params;

/// Params record held in process and updated through `set_params`, the way
/// a governance proposal would update the module's stored params.
#[derive(Debug, Default)]
pub struct ParamsStore {
    params: RwLock<Params>,
}

impl ParamsStore {
    pub fn new(params: Params) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params: RwLock::new(params),
        })
    }

    /// Replaces the stored params. Invalid params are rejected and the
    /// previous record is kept.
    pub fn set_params(&self, params: Params) -> Result<()> {
        params.validate()?;
        let mut guard = match self.params.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = params;
        Ok(())
    }
}

impl ParamsKeeper for ParamsStore {
    fn get_params(&self) -> Params {
        match self.params.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
