//! Provider order for last-known lookups.

/// What one provider reported for its cached fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Lookup<T> {
    /// The platform does not know the provider.
    Unknown,
    /// The provider has never cached a fix.
    Empty,
    /// The cached fix.
    Found(T),
}

/// Ask `providers` for a cached fix.
///
/// The first provider answers for the device when the platform knows it, even
/// when it has no fix. The remaining ones are asked, in order, only when the
/// first is unknown.
pub(crate) fn resolve_last_known<T, E>(
    providers: &[&str],
    mut lookup: impl FnMut(&str) -> Result<Lookup<T>, E>,
) -> Result<Option<T>, E> {
    let Some((preferred, fallbacks)) = providers.split_first() else {
        return Ok(None);
    };

    match lookup(preferred)? {
        Lookup::Found(fix) => return Ok(Some(fix)),
        Lookup::Empty => return Ok(None),
        Lookup::Unknown => log::debug!("{preferred} provider unknown, trying {fallbacks:?}"),
    }

    for provider in fallbacks {
        if let Lookup::Found(fix) = lookup(provider)? {
            return Ok(Some(fix));
        }
    }
    Ok(None)
}
