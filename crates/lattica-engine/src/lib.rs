//! Rule application over entity collections.
//!
//! A *rule* is a caller-supplied function over one entity. Value rules
//! return the entity's next state; void rules mutate in place. The
//! engine applies a rule across a whole collection under a declared
//! update discipline ([`Update`]) and traversal ([`Shuffle`]):
//!
//! | discipline x traversal | void rule | value rule |
//! |---|---|---|
//! | sync, ordered     | rejected | supported |
//! | sync, shuffled    | rejected | supported |
//! | async, ordered    | supported | supported |
//! | async, shuffled   | supported | supported |
//!
//! Synchronous passes write into an engine-owned side buffer and
//! commit after the pass, so no invocation observes a neighbor's new
//! state; the buffer cannot be reached from rules, which makes the
//! one-step consistency contract impossible to violate from model
//! code. Asynchronous passes write through, so later invocations in
//! the same pass see earlier updates.
//!
//! Value rules receive the current entity *and* the whole pre-pass
//! population slice; neighbor observations index into that slice.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use lattica_core::{CoreError, Entity, RuleError, SimRng};
use rand::seq::SliceRandom;

/// The update discipline of a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Update {
    /// Buffer writes, commit after the pass. All invocations observe
    /// pre-pass state.
    Sync,
    /// Write through. Later invocations observe earlier updates.
    Async,
}

/// The traversal of a pass.
///
/// Shuffled traversal carries the RNG it draws from, so a shuffled
/// pass without an RNG is unrepresentable. The permutation is drawn
/// once at pass start; with a fixed seed the pass is reproducible.
pub enum Shuffle<'r> {
    /// Container order.
    Off,
    /// A fresh random permutation of container order.
    On(&'r mut SimRng),
}

/// The visiting order of a pass over `n` entities.
fn traversal(n: usize, shuffle: Shuffle<'_>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    if let Shuffle::On(rng) = shuffle {
        order.shuffle(rng);
    }
    order
}

/// Apply a value rule over a collection.
///
/// The rule receives the entity and the whole population slice. In a
/// synchronous pass every invocation sees the pre-pass states; the
/// results commit in one loop after the pass. A rule error aborts the
/// pass: synchronous passes discard the buffer (no state changes),
/// asynchronous passes keep the updates already written.
pub fn apply_value_rule<E, F>(
    update: Update,
    shuffle: Shuffle<'_>,
    entities: &mut [E],
    mut rule: F,
) -> Result<(), CoreError>
where
    E: Entity,
    F: FnMut(&E, &[E]) -> Result<E::State, RuleError>,
{
    let order = traversal(entities.len(), shuffle);
    match update {
        Update::Sync => {
            let mut buffer: Vec<Option<E::State>> = std::iter::repeat_with(|| None)
                .take(entities.len())
                .collect();
            for &i in &order {
                buffer[i] = Some(rule(&entities[i], entities)?);
            }
            for (entity, slot) in entities.iter_mut().zip(buffer) {
                if let Some(state) = slot {
                    *entity.state_mut() = state;
                }
            }
        }
        Update::Async => {
            for &i in &order {
                let state = rule(&entities[i], entities)?;
                *entities[i].state_mut() = state;
            }
        }
    }
    Ok(())
}

/// Apply a void rule over a collection.
///
/// Void rules mutate the entity in place, which cannot honor the
/// synchronous buffering contract; `Update::Sync` is rejected with
/// [`CoreError::InvalidRule`] before any entity is touched.
pub fn apply_void_rule<E, F>(
    update: Update,
    shuffle: Shuffle<'_>,
    entities: &mut [E],
    mut rule: F,
) -> Result<(), CoreError>
where
    E: Entity,
    F: FnMut(&mut E) -> Result<(), RuleError>,
{
    reject_sync_void(update)?;
    for &i in &traversal(entities.len(), shuffle) {
        rule(&mut entities[i])?;
    }
    Ok(())
}

/// Apply a binary value rule zipped with one parallel slice.
///
/// `with` must be as long as `entities` ([`CoreError::LengthMismatch`]
/// otherwise). Under shuffled traversal a single permutation drives
/// both containers, so the i-th entity always meets the i-th zipped
/// element.
pub fn apply_value_rule_zip<E, A, F>(
    update: Update,
    shuffle: Shuffle<'_>,
    entities: &mut [E],
    with: &[A],
    mut rule: F,
) -> Result<(), CoreError>
where
    E: Entity,
    F: FnMut(&E, &A, &[E]) -> Result<E::State, RuleError>,
{
    check_zip_len(entities.len(), with.len())?;
    let order = traversal(entities.len(), shuffle);
    match update {
        Update::Sync => {
            let mut buffer: Vec<Option<E::State>> = std::iter::repeat_with(|| None)
                .take(entities.len())
                .collect();
            for &i in &order {
                buffer[i] = Some(rule(&entities[i], &with[i], entities)?);
            }
            for (entity, slot) in entities.iter_mut().zip(buffer) {
                if let Some(state) = slot {
                    *entity.state_mut() = state;
                }
            }
        }
        Update::Async => {
            for &i in &order {
                let state = rule(&entities[i], &with[i], entities)?;
                *entities[i].state_mut() = state;
            }
        }
    }
    Ok(())
}

/// Apply a ternary value rule zipped with two parallel slices.
pub fn apply_value_rule_zip2<E, A, B, F>(
    update: Update,
    shuffle: Shuffle<'_>,
    entities: &mut [E],
    first: &[A],
    second: &[B],
    mut rule: F,
) -> Result<(), CoreError>
where
    E: Entity,
    F: FnMut(&E, &A, &B, &[E]) -> Result<E::State, RuleError>,
{
    check_zip_len(entities.len(), first.len())?;
    check_zip_len(entities.len(), second.len())?;
    let order = traversal(entities.len(), shuffle);
    match update {
        Update::Sync => {
            let mut buffer: Vec<Option<E::State>> = std::iter::repeat_with(|| None)
                .take(entities.len())
                .collect();
            for &i in &order {
                buffer[i] = Some(rule(&entities[i], &first[i], &second[i], entities)?);
            }
            for (entity, slot) in entities.iter_mut().zip(buffer) {
                if let Some(state) = slot {
                    *entity.state_mut() = state;
                }
            }
        }
        Update::Async => {
            for &i in &order {
                let state = rule(&entities[i], &first[i], &second[i], entities)?;
                *entities[i].state_mut() = state;
            }
        }
    }
    Ok(())
}

/// Apply a binary void rule zipped with one parallel slice.
/// Asynchronous only, like every void rule.
pub fn apply_void_rule_zip<E, A, F>(
    update: Update,
    shuffle: Shuffle<'_>,
    entities: &mut [E],
    with: &[A],
    mut rule: F,
) -> Result<(), CoreError>
where
    E: Entity,
    F: FnMut(&mut E, &A) -> Result<(), RuleError>,
{
    reject_sync_void(update)?;
    check_zip_len(entities.len(), with.len())?;
    for &i in &traversal(entities.len(), shuffle) {
        rule(&mut entities[i], &with[i])?;
    }
    Ok(())
}

fn reject_sync_void(update: Update) -> Result<(), CoreError> {
    match update {
        Update::Sync => Err(CoreError::InvalidRule {
            reason: "void rules mutate in place and cannot run under synchronous update; \
                     return the new state instead"
                .into(),
        }),
        Update::Async => Ok(()),
    }
}

fn check_zip_len(expected: usize, got: usize) -> Result<(), CoreError> {
    if expected == got {
        Ok(())
    } else {
        Err(CoreError::LengthMismatch { expected, got })
    }
}
