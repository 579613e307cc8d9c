use crate::error::{ErrorOrigin, InternalError};
use derive_more::Deref;
use std::collections::BTreeMap;

/// Bit 0 of every language mask: the row is always available as a fallback.
pub const ALWAYS_AVAILABLE_BIT: u64 = 1;

///
/// LanguageFilter
///
/// Caller-side language restriction. An empty `languages` list means "all
/// languages" and adds no constraint, which is different from a filter that
/// matches nothing.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LanguageFilter {
    pub languages: Vec<String>,
    pub use_always_available: bool,
}

impl LanguageFilter {
    /// No language restriction.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            languages: Vec::new(),
            use_always_available: true,
        }
    }

    #[must_use]
    pub fn new<I, S>(languages: I, use_always_available: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            languages: languages.into_iter().map(Into::into).collect(),
            use_always_available,
        }
    }

    #[must_use]
    pub const fn restricts(&self) -> bool {
        !self.languages.is_empty()
    }
}

///
/// LanguageMask
///

#[derive(Clone, Copy, Debug, Default, Deref, Eq, Hash, PartialEq)]
pub struct LanguageMask(u64);

impl LanguageMask {
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Whether a stored row mask passes this filter mask.
    #[must_use]
    pub const fn matches(self, row_mask: u64) -> bool {
        (row_mask & self.0) > 0
    }

    /// Bound-safe form of the mask; language ids never reach bit 63.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        i64::try_from(self.0).unwrap_or(i64::MAX)
    }
}

///
/// LanguageRegistry
///
/// Language code → reserved bit. Built once at startup; every id must be a
/// distinct power of two other than the always-available bit.
///

#[derive(Clone, Debug, Default)]
pub struct LanguageRegistry {
    by_code: BTreeMap<String, u64>,
}

impl LanguageRegistry {
    pub fn new<I, S>(entries: I) -> Result<Self, InternalError>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut by_code = BTreeMap::new();
        let mut seen = 0u64;

        for (code, id) in entries {
            let code = code.into();
            if !id.is_power_of_two() || id == ALWAYS_AVAILABLE_BIT || id > 1 << 62 {
                return Err(InternalError::configuration(
                    ErrorOrigin::Language,
                    format!("language '{code}' has id {id}; ids must be powers of two >= 2"),
                ));
            }
            if (seen & id) != 0 {
                return Err(InternalError::configuration(
                    ErrorOrigin::Language,
                    format!("language '{code}' reuses id {id}"),
                ));
            }
            seen |= id;
            if by_code.insert(code.clone(), id).is_some() {
                return Err(InternalError::configuration(
                    ErrorOrigin::Language,
                    format!("language '{code}' registered twice"),
                ));
            }
        }

        Ok(Self { by_code })
    }

    pub fn id(&self, code: &str) -> Result<u64, InternalError> {
        self.by_code.get(code).copied().ok_or_else(|| {
            InternalError::not_found(ErrorOrigin::Language, format!("unknown language code '{code}'"))
        })
    }

    /// Mask of the given codes, plus bit 0 when `use_always_available`.
    pub fn mask_for<S: AsRef<str>>(
        &self,
        codes: &[S],
        use_always_available: bool,
    ) -> Result<LanguageMask, InternalError> {
        let mut bits = if use_always_available {
            ALWAYS_AVAILABLE_BIT
        } else {
            0
        };
        for code in codes {
            bits |= self.id(code.as_ref())?;
        }

        Ok(LanguageMask(bits))
    }

    /// Filter mask, or `None` when the filter does not restrict languages.
    pub fn filter_mask(&self, filter: &LanguageFilter) -> Result<Option<LanguageMask>, InternalError> {
        if !filter.restricts() {
            return Ok(None);
        }

        self.mask_for(&filter.languages, filter.use_always_available)
            .map(Some)
    }
}
