//! Synthetic supply-chain participants.

use rand::Rng;
use shared_types::{ActorId, ProductStatus, ValidationError};
use std::fmt;

/// Participant role; each performs exactly one lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Supplier,
    Manufacturer,
    Distributor,
    Retailer,
    Customer,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Supplier,
        Role::Manufacturer,
        Role::Distributor,
        Role::Retailer,
        Role::Customer,
    ];

    /// Role that moves a product into `status`.
    pub fn for_status(status: ProductStatus) -> Role {
        match status {
            ProductStatus::Created => Role::Supplier,
            ProductStatus::Manufactured => Role::Manufacturer,
            ProductStatus::InTransit => Role::Distributor,
            ProductStatus::AvailableForSale => Role::Retailer,
            ProductStatus::Purchased => Role::Customer,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Supplier => "Supplier",
            Role::Manufacturer => "Manufacturer",
            Role::Distributor => "Distributor",
            Role::Retailer => "Retailer",
            Role::Customer => "Customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed pool of actors per role, named `Role_k` (k from 1).
#[derive(Debug, Clone)]
pub struct ActorDirectory {
    /// Indexed by `Role::ALL` position.
    actors: Vec<Vec<ActorId>>,
}

impl ActorDirectory {
    pub fn new(per_role: usize) -> Result<Self, ValidationError> {
        if per_role == 0 {
            return Err(ValidationError::out_of_range(
                "actors_per_role",
                per_role,
                ">= 1",
            ));
        }
        let actors = Role::ALL
            .iter()
            .map(|role| {
                (1..=per_role)
                    .map(|k| ActorId::new(format!("{}_{}", role, k)))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { actors })
    }

    /// All actors of a role.
    pub fn of(&self, role: Role) -> &[ActorId] {
        &self.actors[Self::slot(role)]
    }

    /// Uniformly pick an actor of `role`.
    pub fn pick<R: Rng + ?Sized>(&self, role: Role, rng: &mut R) -> &ActorId {
        let pool = self.of(role);
        &pool[rng.gen_range(0..pool.len())]
    }

    fn slot(role: Role) -> usize {
        match role {
            Role::Supplier => 0,
            Role::Manufacturer => 1,
            Role::Distributor => 2,
            Role::Retailer => 3,
            Role::Customer => 4,
        }
    }
}
