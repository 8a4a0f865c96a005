//! Transaction boundary for session commands

/// Run `f` against a draft copy of `state`. The draft replaces the live state
/// only when `f` returns `Ok`; on `Err` the live state is untouched.
#[inline]
pub(crate) fn transact<S: Clone, T, E, F>(state: &mut S, f: F) -> Result<T, E>
where
    F: FnOnce(&mut S) -> Result<T, E>,
{
    let mut draft = state.clone();
    let r = f(&mut draft)?;
    *state = draft;
    Ok(r)
}
