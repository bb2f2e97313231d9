//! Onboard consumable stock: decrement on use, alert on par-level breach.
//!
//! Breach detection is stateless across calls: every consumption that lands
//! (or stays) below par produces a fresh notification. Quantities are signed
//! and deliberately not clamped at zero; negative stock signals
//! over-consumption to reconcile upstream.

use std::collections::HashMap;

use bevy_ecs::prelude::{Entity, Resource, World};
use tracing::warn;

use crate::bus::{self, DispatchEvent};
use crate::care::SupplyUsage;
use crate::clock::DispatchClock;
use crate::error::DispatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplyLevel {
    pub quantity: i64,
    pub par_level: i64,
}

/// Per-ambulance stock ledger keyed by (unit, supply name).
#[derive(Debug, Default, Resource)]
pub struct SupplyStore {
    levels: HashMap<(Entity, String), SupplyLevel>,
}

impl SupplyStore {
    pub fn set_level(&mut self, ambulance: Entity, supply: &str, quantity: i64, par_level: i64) {
        self.levels.insert(
            (ambulance, supply.to_string()),
            SupplyLevel {
                quantity,
                par_level,
            },
        );
    }

    pub fn level(&self, ambulance: Entity, supply: &str) -> Option<SupplyLevel> {
        self.levels.get(&(ambulance, supply.to_string())).copied()
    }

    /// Decrement a row, returning the resulting level. `None` if the row is
    /// missing.
    fn consume(&mut self, ambulance: Entity, supply: &str, used: i64) -> Option<SupplyLevel> {
        let level = self.levels.get_mut(&(ambulance, supply.to_string()))?;
        level.quantity -= used;
        Some(*level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStatus {
    Unread,
    Read,
}

/// A low-supply alert captured at detection time. Never auto-expires; it
/// terminates only by being marked read.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub ambulance: Entity,
    pub supply_name: String,
    pub quantity: i64,
    pub par_level: i64,
    pub status: NotificationStatus,
    pub created_at_ms: u64,
}

/// Append-only notification ledger.
#[derive(Debug, Default, Resource)]
pub struct NotificationLog {
    next_id: u64,
    entries: Vec<Notification>,
}

impl NotificationLog {
    pub fn push(
        &mut self,
        ambulance: Entity,
        supply_name: &str,
        quantity: i64,
        par_level: i64,
        created_at_ms: u64,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Notification {
            id,
            ambulance,
            supply_name: supply_name.to_string(),
            quantity,
            par_level,
            status: NotificationStatus::Unread,
            created_at_ms,
        });
        id
    }

    pub fn unread(&self) -> impl Iterator<Item = &Notification> {
        self.entries
            .iter()
            .filter(|n| n.status == NotificationStatus::Unread)
    }

    pub fn mark_read(&mut self, id: u64) -> Result<(), DispatchError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(DispatchError::NotificationNotFound(id))?;
        entry.status = NotificationStatus::Read;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Apply a structured usage report against one ambulance's stock.
///
/// Fire-and-forget per entry: a missing (unit, supply) row is logged and
/// skipped, never raised to the caller. Each entry whose resulting quantity
/// falls below par creates exactly one unread notification and emits exactly
/// one `newNotification` event.
pub fn consume_supplies(world: &mut World, ambulance: Entity, usage: &SupplyUsage) {
    let now_ms = world.resource::<DispatchClock>().now();
    for (supply_name, used) in &usage.items {
        let level = world
            .resource_mut::<SupplyStore>()
            .consume(ambulance, supply_name, *used);
        let Some(level) = level else {
            warn!(
                ambulance = ?ambulance,
                supply = %supply_name,
                "no inventory row for consumed supply; skipping"
            );
            continue;
        };
        if level.quantity < level.par_level {
            world.resource_mut::<NotificationLog>().push(
                ambulance,
                supply_name,
                level.quantity,
                level.par_level,
                now_ms,
            );
            bus::emit(
                world,
                DispatchEvent::NewNotification {
                    ambulance,
                    supply_name: supply_name.clone(),
                    current_quantity: level.quantity,
                    par_level: level.par_level,
                    timestamp_ms: now_ms,
                },
            );
        }
    }
}
