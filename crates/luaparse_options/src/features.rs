//! Grammar feature flags derived from the selected dialect.

use crate::LuaVersion;

bitflags::bitflags! {
    /// Grammar decisions that differ between dialects.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Features: u32 {
        const NONE                   = 0;
        /// `::label::` and `goto`.
        const LABELS                 = 1 << 0;
        /// A bare `;` is a statement.
        const EMPTY_STATEMENT        = 1 << 1;
        /// `\xXX` in strings.
        const HEX_ESCAPES            = 1 << 2;
        /// `\z` in strings.
        const SKIP_WHITESPACE_ESCAPE = 1 << 3;
        /// Unknown escapes are errors.
        const STRICT_ESCAPES         = 1 << 4;
        /// `break` may appear anywhere in a block.
        const RELAXED_BREAK          = 1 << 5;
        /// `\u{XXX}` in strings.
        const UNICODE_ESCAPES        = 1 << 6;
        /// `& | ~ << >>` and unary `~`.
        const BITWISE_OPERATORS      = 1 << 7;
        /// `//`.
        const INTEGER_DIVISION       = 1 << 8;
        /// `goto` is only a keyword when followed by a name.
        const CONTEXTUAL_GOTO        = 1 << 9;
        /// Numeric suffix `i`.
        const IMAGINARY_NUMBERS      = 1 << 10;
        /// Numeric suffixes `LL` and `ULL`.
        const INTEGER_SUFFIXES       = 1 << 11;
        /// Hexadecimal fractions and `p` exponents.
        const HEX_FLOATS             = 1 << 12;
        /// `name : Type` in declarations and parameters.
        const TYPED_IDENTIFIERS      = 1 << 13;
        /// `hstructure Name ... end`.
        const HSTRUCTURE             = 1 << 14;
        /// `hmake Type { ... }`.
        const HMAKE                  = 1 << 15;
        /// A call's `(` may start a new line.
        const FLEXIBLE_EOL           = 1 << 16;

        const LUA_52 = Self::LABELS.bits()
            | Self::EMPTY_STATEMENT.bits()
            | Self::HEX_ESCAPES.bits()
            | Self::SKIP_WHITESPACE_ESCAPE.bits()
            | Self::STRICT_ESCAPES.bits()
            | Self::RELAXED_BREAK.bits()
            | Self::FLEXIBLE_EOL.bits()
            | Self::HEX_FLOATS.bits();
        const LUA_53 = Self::LUA_52.bits()
            | Self::UNICODE_ESCAPES.bits()
            | Self::BITWISE_OPERATORS.bits()
            | Self::INTEGER_DIVISION.bits();
        const LUAJIT = Self::LABELS.bits()
            | Self::CONTEXTUAL_GOTO.bits()
            | Self::HEX_ESCAPES.bits()
            | Self::SKIP_WHITESPACE_ESCAPE.bits()
            | Self::STRICT_ESCAPES.bits()
            | Self::UNICODE_ESCAPES.bits()
            | Self::IMAGINARY_NUMBERS.bits()
            | Self::INTEGER_SUFFIXES.bits()
            | Self::HEX_FLOATS.bits();
        const HAVOKSCRIPT = Self::TYPED_IDENTIFIERS.bits()
            | Self::HSTRUCTURE.bits()
            | Self::HMAKE.bits();
    }
}

impl Features {
    /// The feature set of a dialect.
    pub fn for_version(version: LuaVersion) -> Self {
        match version {
            LuaVersion::Lua51 => Features::NONE,
            LuaVersion::Lua52 => Features::LUA_52,
            LuaVersion::Lua53 => Features::LUA_53,
            LuaVersion::LuaJit => Features::LUAJIT,
            LuaVersion::HavokScript51 => Features::HAVOKSCRIPT,
        }
    }

    #[inline]
    pub fn labels(self) -> bool {
        self.contains(Features::LABELS)
    }

    /// Whether `goto` is lexed as a reserved word.
    #[inline]
    pub fn goto_is_keyword(self) -> bool {
        self.contains(Features::LABELS) && !self.contains(Features::CONTEXTUAL_GOTO)
    }
}
