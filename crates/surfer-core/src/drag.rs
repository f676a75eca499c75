//! Hydrodynamic drag.
//!
//! Drag is not modelled yet. [`NoDrag`] fills the slot in the pipeline so
//! that a real model can be dropped in without reordering anything.

use std::fmt::Debug;

use crate::error::SimError;
use crate::quantity::Quantity;
use crate::step::{StepContext, VectorQuantity};

/// Computes drag for the step being built. `None` means no contribution.
pub trait DragModel: Debug + Send + Sync {
    fn name(&self) -> &str;

    fn drag(
        &self,
        ctx: &StepContext<'_>,
        sea_current: &VectorQuantity,
    ) -> Result<Option<Quantity>, SimError>;
}

/// Reports no drag on every step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDrag;

impl DragModel for NoDrag {
    fn name(&self) -> &str {
        "none"
    }

    fn drag(
        &self,
        _ctx: &StepContext<'_>,
        _sea_current: &VectorQuantity,
    ) -> Result<Option<Quantity>, SimError> {
        Ok(None)
    }
}
