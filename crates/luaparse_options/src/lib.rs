//! luaparse_options: Parse options and dialect selection.
//!
//! [`ParseOptions`] can be built in code or loaded from a JSON document.
//! Both the descriptive field names (`trackScopes`, `grammarVersion`) and the
//! short names used by luaparse (`scope`, `luaVersion`) are accepted.

mod features;

pub use features::Features;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The grammar dialects the parser understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LuaVersion {
    #[default]
    #[serde(rename = "5.1")]
    Lua51,
    #[serde(rename = "5.2")]
    Lua52,
    #[serde(rename = "5.3")]
    Lua53,
    #[serde(rename = "LuaJIT")]
    LuaJit,
    #[serde(rename = "HavokScript5.1")]
    HavokScript51,
}

impl LuaVersion {
    pub const ALL: [LuaVersion; 5] = [
        LuaVersion::Lua51,
        LuaVersion::Lua52,
        LuaVersion::Lua53,
        LuaVersion::LuaJit,
        LuaVersion::HavokScript51,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LuaVersion::Lua51 => "5.1",
            LuaVersion::Lua52 => "5.2",
            LuaVersion::Lua53 => "5.3",
            LuaVersion::LuaJit => "LuaJIT",
            LuaVersion::HavokScript51 => "HavokScript5.1",
        }
    }

    /// The grammar features enabled by this dialect.
    pub fn features(self) -> Features {
        Features::for_version(self)
    }
}

impl fmt::Display for LuaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LuaVersion {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LuaVersion::ALL
            .into_iter()
            .find(|version| version.as_str() == s)
            .ok_or_else(|| OptionsError::UnknownVersion(s.to_string()))
    }
}

/// Errors raised while loading options.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("invalid parse options: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown grammar version '{0}'")]
    UnknownVersion(String),
}

/// Options controlling a single parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Defer end-of-input errors until the caller declares the input final.
    #[serde(alias = "wait")]
    pub incremental_input: bool,
    /// Populate `Chunk.comments`.
    #[serde(alias = "comments")]
    pub collect_comments: bool,
    /// Run the scope tracker: set `is_local` and collect `Chunk.globals`.
    #[serde(alias = "scope")]
    pub track_scopes: bool,
    /// Attach line/column locations to every node.
    #[serde(alias = "locations")]
    pub record_locations: bool,
    /// Attach byte ranges to every node.
    #[serde(alias = "ranges")]
    pub record_byte_ranges: bool,
    #[serde(alias = "luaVersion")]
    pub grammar_version: LuaVersion,
    /// Accept non-ASCII identifier characters.
    #[serde(alias = "extendedIdentifiers")]
    pub extended_identifier_chars: bool,
    /// Reject a `goto` whose label is never visible from it.
    pub check_goto_labels: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            incremental_input: false,
            collect_comments: true,
            track_scopes: false,
            record_locations: false,
            record_byte_ranges: false,
            grammar_version: LuaVersion::Lua51,
            extended_identifier_chars: false,
            check_goto_labels: false,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON document.
    pub fn from_json(content: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn features(&self) -> Features {
        self.grammar_version.features()
    }

    /// Whether any per-node position metadata is requested.
    pub fn annotates_nodes(&self) -> bool {
        self.record_locations || self.record_byte_ranges
    }

    pub fn with_version(mut self, version: LuaVersion) -> Self {
        self.grammar_version = version;
        self
    }

    pub fn with_scopes(mut self, enabled: bool) -> Self {
        self.track_scopes = enabled;
        self
    }

    pub fn with_locations(mut self, enabled: bool) -> Self {
        self.record_locations = enabled;
        self
    }

    pub fn with_ranges(mut self, enabled: bool) -> Self {
        self.record_byte_ranges = enabled;
        self
    }

    pub fn with_comments(mut self, enabled: bool) -> Self {
        self.collect_comments = enabled;
        self
    }

    pub fn with_incremental_input(mut self, enabled: bool) -> Self {
        self.incremental_input = enabled;
        self
    }

    pub fn with_extended_identifiers(mut self, enabled: bool) -> Self {
        self.extended_identifier_chars = enabled;
        self
    }

    pub fn with_goto_label_checks(mut self, enabled: bool) -> Self {
        self.check_goto_labels = enabled;
        self
    }
}
