//! Position bookkeeping over an in-memory wagon sequence.
//!
//! Every function takes the sequence in train order and leaves it with
//! positions `1..=N` in the same order as the vector.

use crate::error::{EngineError, EngineResult, ReorderError};
use cs_core::{CoreError, CoreResult, WagonId};
use cs_model::Wagon;
use std::collections::{HashMap, HashSet};

fn len_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Sort stored wagons into train order. Ties break by id.
pub fn sort_by_position(wagons: &mut [Wagon]) {
    wagons.sort_by_key(|w| (w.position, w.id));
}

/// Assign positions `1..=N` following vector order.
pub fn renumber(wagons: &mut [Wagon]) {
    for (wagon, position) in wagons.iter_mut().zip(1u32..) {
        wagon.position = position;
    }
}

pub fn is_contiguous(wagons: &[Wagon]) -> bool {
    wagons.iter().zip(1u32..).all(|(w, p)| w.position == p)
}

pub fn check_contiguous(wagons: &[Wagon]) -> CoreResult<()> {
    if is_contiguous(wagons) {
        Ok(())
    } else {
        Err(CoreError::Invariant {
            what: "wagon positions must be 1..=N in train order",
        })
    }
}

/// Vector index for an insertion at `position`; `None` appends.
pub fn insertion_index(len: usize, position: Option<u32>) -> EngineResult<usize> {
    let max = len_u32(len).saturating_add(1);
    match position {
        None => Ok(len),
        Some(p) if (1..=max).contains(&p) => Ok(p as usize - 1),
        Some(p) => Err(EngineError::InvalidPosition { position: p, max }),
    }
}

/// Insert `wagon` at `position`, shifting later wagons back by one.
pub fn insert_at(wagons: &mut Vec<Wagon>, position: Option<u32>, wagon: Wagon) -> EngineResult<usize> {
    let index = insertion_index(wagons.len(), position)?;
    wagons.insert(index, wagon);
    renumber(wagons);
    Ok(index)
}

/// Remove a wagon, closing the gap it leaves.
pub fn remove(wagons: &mut Vec<Wagon>, wagon_id: WagonId) -> Option<Wagon> {
    let index = wagons.iter().position(|w| w.id == wagon_id)?;
    let removed = wagons.remove(index);
    renumber(wagons);
    Some(removed)
}

/// Insert one copy of `source_id` per entry of `new_ids`, directly behind the
/// source and in the given order. Returns the copies with their final positions.
pub fn clone_after(
    wagons: &mut Vec<Wagon>,
    source_id: WagonId,
    new_ids: &[WagonId],
) -> Option<Vec<Wagon>> {
    let index = wagons.iter().position(|w| w.id == source_id)?;
    let source = wagons[index].clone();
    let copies = new_ids.iter().map(|&id| Wagon {
        id,
        train_id: source.train_id,
        position: source.position,
        spec: source.spec.clone(),
    });
    let at = index + 1;
    wagons.splice(at..at, copies);
    renumber(wagons);
    Some(wagons[at..at + new_ids.len()].to_vec())
}

/// Move an existing wagon to `position` within `1..=N`.
pub fn move_to(wagons: &mut Vec<Wagon>, wagon_id: WagonId, position: u32) -> EngineResult<usize> {
    let max = len_u32(wagons.len());
    if position == 0 || position > max {
        return Err(EngineError::InvalidPosition { position, max });
    }
    let Some(from) = wagons.iter().position(|w| w.id == wagon_id) else {
        return Err(EngineError::InvalidArgument {
            what: format!("wagon {wagon_id} is not part of the sequence"),
        });
    };
    let wagon = wagons.remove(from);
    let to = position as usize - 1;
    wagons.insert(to, wagon);
    renumber(wagons);
    Ok(to)
}

/// Rebuild the sequence in `order`, which must name every wagon exactly once.
pub fn apply_order(wagons: &[Wagon], order: &[WagonId]) -> Result<Vec<Wagon>, ReorderError> {
    let by_id: HashMap<WagonId, &Wagon> = wagons.iter().map(|w| (w.id, w)).collect();
    let mut seen = HashSet::with_capacity(order.len());
    let mut next = Vec::with_capacity(order.len());

    for &id in order {
        let Some(wagon) = by_id.get(&id) else {
            return Err(ReorderError::Unknown(id));
        };
        if !seen.insert(id) {
            return Err(ReorderError::Duplicate(id));
        }
        next.push((*wagon).clone());
    }

    if next.len() != wagons.len() {
        let mut missing: Vec<WagonId> = wagons
            .iter()
            .map(|w| w.id)
            .filter(|id| !seen.contains(id))
            .collect();
        missing.sort_unstable();
        return Err(ReorderError::Missing(missing));
    }

    renumber(&mut next);
    Ok(next)
}
