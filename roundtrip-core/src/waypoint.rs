//! Stops on a route, including the home location.

use crate::InputError;

/// Notes attached to the home waypoint.
pub const HOME_NOTES: &str = "Home";

/// A place to visit.
///
/// Waypoints are immutable once constructed. The home waypoint is the one the
/// caller places at the home index; the `is_home` flag mirrors that choice for
/// presentation.
///
/// # Examples
/// ```
/// use roundtrip_core::Waypoint;
///
/// # fn main() -> Result<(), roundtrip_core::InputError> {
/// let home = Waypoint::home("1 Main Street")?;
/// let stop = Waypoint::stop(" 22 Elm Road ", "ring twice")?;
///
/// assert!(home.is_home());
/// assert_eq!(home.notes(), "Home");
/// assert_eq!(stop.address(), "22 Elm Road");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waypoint {
    address: String,
    notes: String,
    is_home: bool,
}

impl Waypoint {
    /// Construct the home waypoint.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::EmptyAddress`] when `address` is blank.
    pub fn home(address: impl Into<String>) -> Result<Self, InputError> {
        Self::build(address.into(), HOME_NOTES.to_owned(), true)
    }

    /// Construct a stop with free-form notes.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::EmptyAddress`] when `address` is blank.
    pub fn stop(address: impl Into<String>, notes: impl Into<String>) -> Result<Self, InputError> {
        Self::build(address.into(), notes.into(), false)
    }

    fn build(address: String, notes: String, is_home: bool) -> Result<Self, InputError> {
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(InputError::EmptyAddress);
        }
        Ok(Self {
            address: trimmed.to_owned(),
            notes: notes.trim().to_owned(),
            is_home,
        })
    }

    /// Address used for matrix lookups and the share link.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Caller-supplied notes.
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Whether this waypoint was constructed as home.
    #[must_use]
    pub const fn is_home(&self) -> bool {
        self.is_home
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_addresses_are_rejected(#[case] address: &str) {
        assert_eq!(Waypoint::stop(address, ""), Err(InputError::EmptyAddress));
        assert_eq!(Waypoint::home(address), Err(InputError::EmptyAddress));
    }

    #[rstest]
    fn stop_trims_address_and_notes() {
        let stop = Waypoint::stop("  5 Pier Lane ", " back door ").expect("valid stop");
        assert_eq!(stop.address(), "5 Pier Lane");
        assert_eq!(stop.notes(), "back door");
        assert!(!stop.is_home());
    }

    #[rstest]
    fn home_uses_home_notes() {
        let home = Waypoint::home("1 Main Street").expect("valid home");
        assert_eq!(home.notes(), HOME_NOTES);
        assert!(home.is_home());
    }
}
