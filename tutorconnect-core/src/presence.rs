//! Random-walk presence simulation.
//!
//! Each tick, every tutor independently advances to the next status with
//! probability `flip_probability`. There is no reconciliation with an active
//! session: a tutor in session can drift to offline and back.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{PresenceStatus, Tutor};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceChange {
    pub tutor_id: String,
    pub from: PresenceStatus,
    pub to: PresenceStatus,
}

/// Apply one simulator tick in place and report what changed.
pub fn simulate_tick<R: Rng + ?Sized>(
    tutors: &mut [Tutor],
    flip_probability: f64,
    rng: &mut R,
) -> Vec<PresenceChange> {
    let p = if flip_probability.is_nan() {
        0.0
    } else {
        flip_probability.clamp(0.0, 1.0)
    };

    let mut changes = Vec::new();
    for tutor in tutors.iter_mut() {
        if rng.gen_bool(p) {
            let from = tutor.status;
            tutor.status = from.next();
            changes.push(PresenceChange {
                tutor_id: tutor.id.clone(),
                from,
                to: tutor.status,
            });
        }
    }
    changes
}
