//! Acceptance criteria for shooting points.
//!
//! An acceptor is a pure predicate over a [`ShootingResult`]; all of its
//! configuration is validated at construction time, never at evaluation time.

use crate::core::models::{BasinId, ShootingResult};
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum AcceptorError {
    #[error("Reactants must contain at least one basin")]
    EmptyReactants,

    #[error("Products must contain at least one basin")]
    EmptyProducts,

    #[error("Reactants and products cannot share basins: {0:?}")]
    SharedBasins(Vec<BasinId>),
}

/// Decides whether a shooting point counts as a sampled transition state.
pub trait Acceptor: Send + Sync {
    fn is_accepted(&self, result: &ShootingResult) -> bool;
}

/// Accepts when both trajectories committed, to different basins.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultAcceptor;

impl Acceptor for DefaultAcceptor {
    fn is_accepted(&self, result: &ShootingResult) -> bool {
        result.both_committed() && result.forward.commit != result.reverse.commit
    }
}

/// Acceptor with basins partitioned into reactants and products.
///
/// To be accepted, both trajectories must have committed, one to a reactant
/// basin and the other to a product basin, in either order. Two trajectories
/// committing to two different reactant basins are rejected.
#[derive(Debug, Clone)]
pub struct MultiBasinAcceptor {
    reactants: HashSet<BasinId>,
    products: HashSet<BasinId>,
}

impl MultiBasinAcceptor {
    /// # Errors
    ///
    /// Fails if either set is empty or the sets intersect.
    pub fn new(
        reactants: HashSet<BasinId>,
        products: HashSet<BasinId>,
    ) -> Result<Self, AcceptorError> {
        if reactants.is_empty() {
            return Err(AcceptorError::EmptyReactants);
        }
        if products.is_empty() {
            return Err(AcceptorError::EmptyProducts);
        }
        let mut shared: Vec<BasinId> = reactants.intersection(&products).copied().collect();
        if !shared.is_empty() {
            shared.sort_unstable();
            return Err(AcceptorError::SharedBasins(shared));
        }
        Ok(Self {
            reactants,
            products,
        })
    }
}

impl Acceptor for MultiBasinAcceptor {
    fn is_accepted(&self, result: &ShootingResult) -> bool {
        let (Some(forward), Some(reverse)) = (result.forward.commit, result.reverse.commit)
        else {
            return false;
        };

        (self.reactants.contains(&forward) && self.products.contains(&reverse))
            || (self.products.contains(&forward) && self.reactants.contains(&reverse))
    }
}

/// Declarative acceptor selection, constructed fresh for every parallel
/// sampler instance so none of them share state.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum AcceptorConfig {
    Default,
    MultiBasin {
        reactants: Vec<BasinId>,
        products: Vec<BasinId>,
    },
}

impl AcceptorConfig {
    /// Builds a boxed acceptor from this configuration.
    ///
    /// # Errors
    ///
    /// Fails with the multi-basin construction errors when the basin sets are
    /// empty or overlapping.
    pub fn build(&self) -> Result<Box<dyn Acceptor>, AcceptorError> {
        match self {
            AcceptorConfig::Default => Ok(Box::new(DefaultAcceptor)),
            AcceptorConfig::MultiBasin {
                reactants,
                products,
            } => Ok(Box::new(MultiBasinAcceptor::new(
                reactants.iter().copied().collect(),
                products.iter().copied().collect(),
            )?)),
        }
    }
}
