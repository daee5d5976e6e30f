use core::fmt;
use core::str::FromStr;

/// Prefix carried by every inventory identifier.
pub const IDENTIFIER_PREFIX: &str = "INV";

/// Inclusive year window accepted in a date partition.
pub const MIN_YEAR: u16 = 2000;
/// See [`MIN_YEAR`].
pub const MAX_YEAR: u16 = 2100;

/// Largest sequence number a single (owner, date) partition can hold.
pub const MAX_SEQUENCE: u32 = 99_999;

/// Error raised when text fails structural validation as an identifier or
/// one of its components.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// The text does not match the `INV-YYYYMMDD-NNNNN` shape.
    #[error("malformed identifier: {value:?}")]
    Malformed { value: String },

    /// The date field is outside the supported structural bounds.
    #[error("date out of range: {year:04}-{month:02}-{day:02}")]
    DateOutOfRange { year: u16, month: u8, day: u8 },

    /// The sequence field is zero or beyond the per-day capacity.
    #[error("sequence out of range: {sequence}")]
    SequenceOutOfRange { sequence: u32 },
}

/// Tenant key that scopes uniqueness and sequencing.
///
/// Two owners can mint the same identifier text on the same day without
/// conflict; all store queries are filtered by this scope.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OwnerScope(String);

impl OwnerScope {
    pub fn new(scope: impl Into<String>) -> Self {
        Self(scope.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerScope {
    fn from(scope: &str) -> Self {
        Self(scope.to_owned())
    }
}

impl From<String> for OwnerScope {
    fn from(scope: String) -> Self {
        Self(scope)
    }
}

/// Key of an inventory record, as issued by the backing store.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The calendar day an identifier was minted under, validated
/// structurally.
///
/// Validation is bounds-only: year within 2000..=2100, month within
/// 1..=12, day within 1..=31. The day is never checked against the real
/// length of the month, so `20240230` passes. Identifiers already in the
/// field rely on the looser rule, which makes it part of the
/// compatibility surface rather than a bug to fix.
///
/// Displays as the fixed-width `YYYYMMDD` digits used in identifier text,
/// so lexicographic order of the rendered form matches chronological
/// order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatePartition {
    year: u16,
    month: u8,
    day: u8,
}

impl DatePartition {
    /// Builds a partition from calendar components.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::DateOutOfRange`] when any component
    /// falls outside the structural bounds.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, IdentifierError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year)
            || !(1..=12).contains(&month)
            || !(1..=31).contains(&day)
        {
            return Err(IdentifierError::DateOutOfRange { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }
}

impl fmt::Display for DatePartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

/// Position of an identifier within its (owner, date) partition.
///
/// Valid values are 1 through [`MAX_SEQUENCE`]; zero is reserved and
/// rejected. Displays as the zero-padded five digits used in identifier
/// text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sequence(u32);

impl Sequence {
    /// First sequence issued on a fresh (owner, date) partition.
    pub const FIRST: Self = Self(1);

    /// Builds a sequence from its numeric value.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::SequenceOutOfRange`] for zero or for
    /// values beyond [`MAX_SEQUENCE`].
    pub fn new(value: u32) -> Result<Self, IdentifierError> {
        if value == 0 || value > MAX_SEQUENCE {
            return Err(IdentifierError::SequenceOutOfRange { sequence: value });
        }
        Ok(Self(value))
    }

    /// Next sequence, or `None` once the per-day space is spent.
    ///
    /// The partition holds exactly [`MAX_SEQUENCE`] values; there is no
    /// wrap-around.
    pub fn next(self) -> Option<Self> {
        if self.0 == MAX_SEQUENCE {
            None
        } else {
            Some(Self(self.0 + 1))
        }
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:05}", self.0)
    }
}

/// A minted inventory identifier: `INV-YYYYMMDD-NNNNN`.
///
/// Identifiers are created once, printed, and never mutated or reused.
/// Construction goes through validated components, so every value of this
/// type renders to well-formed text; parsing stored text back goes
/// through [`FromStr`] and surfaces corruption explicitly.
///
/// Ordering follows (date, sequence), which for the fixed-width rendered
/// form is exactly lexicographic string order. Stores may therefore sort
/// raw identifier text to find the day's maximum.
///
/// # Example
///
/// ```
/// use tagmint::Identifier;
///
/// let id: Identifier = "INV-20241118-00001".parse().expect("well-formed");
/// assert_eq!(id.date().year(), 2024);
/// assert_eq!(id.sequence().value(), 1);
/// assert_eq!(id.to_string(), "INV-20241118-00001");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier {
    date: DatePartition,
    sequence: Sequence,
}

impl Identifier {
    /// Composes an identifier from validated components.
    pub fn new(date: DatePartition, sequence: Sequence) -> Self {
        Self { date, sequence }
    }

    pub fn date(&self) -> DatePartition {
        self.date
    }

    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    /// Store-query prefix covering every identifier minted on `date`:
    /// `INV-YYYYMMDD-`.
    pub fn day_prefix(date: DatePartition) -> String {
        format!("{IDENTIFIER_PREFIX}-{date}-")
    }

    /// Returns whether `text` parses as a well-formed identifier.
    pub fn is_valid(text: &str) -> bool {
        text.parse::<Self>().is_ok()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{IDENTIFIER_PREFIX}-{}-{}", self.date, self.sequence)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || IdentifierError::Malformed { value: s.to_owned() };

        let fields: Vec<&str> = s.split('-').collect();
        let [prefix, date, seq] = fields[..] else {
            return Err(malformed());
        };
        if prefix != IDENTIFIER_PREFIX
            || date.len() != 8
            || seq.len() != 5
            || !date.bytes().all(|b| b.is_ascii_digit())
            || !seq.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }

        let year: u16 = date[..4].parse().map_err(|_| malformed())?;
        let month: u8 = date[4..6].parse().map_err(|_| malformed())?;
        let day: u8 = date[6..8].parse().map_err(|_| malformed())?;
        let sequence: u32 = seq.parse().map_err(|_| malformed())?;

        Ok(Self {
            date: DatePartition::new(year, month, day)?,
            sequence: Sequence::new(sequence)?,
        })
    }
}
