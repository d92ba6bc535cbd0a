//! Symbol module - String interning for efficient identifier handling.
//!
//! This module provides the [`Symbol`] type, which is a compact (4-byte) handle
//! to an interned string. Symbols enable O(1) string comparison and reduce memory
//! usage when the same string appears multiple times in the compiler.
//!
//! # Overview
//!
//! The symbol interning system is a core component of the compiler front end,
//! providing:
//!
//! - **Memory efficiency**: Each unique string is stored only once
//! - **Fast comparison**: Symbol comparison is O(1) via index comparison
//! - **Thread safety**: Safe to use across multiple threads concurrently
//! - **Stable handles**: Symbols remain valid for the program lifetime
//!
//! # Performance Characteristics
//!
//! | Operation | Complexity | Notes |
//! |-----------|------------|-------|
//! | `Symbol::intern()` (hit) | O(1) | String already interned |
//! | `Symbol::intern()` (miss) | O(1) | New string allocation |
//! | `Symbol` comparison | O(1) | Index comparison only |
//! | `Symbol::as_str()` | O(n) | Linear search by index |
//! | `Symbol::eq_str()` | O(1) | Hash + pointer comparison |
//!
//! # Thread Safety
//!
//! The symbol interner is fully thread-safe (`Sync + Send`). Multiple threads
//! can intern strings concurrently without blocking each other, thanks to
//! DashMap's lock-free design.
//!
//! # Memory Model
//!
//! Interned strings are allocated on the heap with `'static` lifetime.
//! They are never deallocated, which is acceptable because:
//! 1. The compiler runs for a finite duration
//! 2. The total memory usage is bounded by source code size
//! 3. This avoids complex lifetime tracking
//!
//! # Examples
//!
//! Basic usage:
//!
//! ```
//! use gsc_util::symbol::Symbol;
//!
//! let s1 = Symbol::intern("hello");
//! let s2 = Symbol::intern("hello");
//! let s3 = Symbol::intern("world");
//!
//! assert_eq!(s1, s2);  // Same symbol for same string
//! assert_ne!(s1, s3);  // Different strings get different symbols
//! ```
//!
//! Using language keywords:
//!
//! ```
//! use gsc_util::symbol::{Symbol, KW_SPEC, KW_RETURN};
//!
//! assert_eq!(KW_SPEC.as_str(), "spec");
//! assert_eq!(KW_RETURN.as_str(), "return");
//! assert!(KW_SPEC.is_known());  // Pre-defined keyword
//! ```
//!
//! Thread-safe usage:
//!
//! ```
//! use gsc_util::symbol::Symbol;
//! use std::thread;
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|i| {
//!         thread::spawn(move || {
//!             Symbol::intern(&format!("thread_{}", i))
//!         })
//!     })
//!     .collect();
//!
//! let symbols: Vec<_> = handles.into_iter()
//!     .map(|h| h.join().unwrap())
//!     .collect();
//!
//! // All symbols are unique
//! assert_eq!(symbols.len(), 4);
//! ```
//!
//! # Statistics and Profiling
//!
//! The interner tracks hit/miss statistics for performance profiling:
//!
//! ```
//! use gsc_util::symbol::Symbol;
//!
//! let _ = Symbol::intern("test");
//! let _ = Symbol::intern("test");  // Hit
//!
//! let stats = Symbol::stats_struct();
//! println!("Hits: {}, Misses: {}", stats.hits, stats.misses);
//! ```

mod interner;

pub use interner::STRING_TABLE;

/// Statistics about the string interner for profiling
///
/// Provides insights into memory usage and efficiency of the interner.
///
/// # Fields
///
/// * `count` - Number of unique interned strings
/// * `capacity` - Hash map capacity (number of buckets)
/// * `collisions` - Number of hash collisions encountered
/// * `hits` - Number of times an already-interned string was requested
/// * `misses` - Number of times a new string was allocated
///
/// # Examples
///
/// ```
/// use gsc_util::symbol::{Symbol, InternerStats};
///
/// let stats = Symbol::stats_struct();
/// println!("Interned {} strings", stats.count);
/// println!("Hit rate: {:.2}%", stats.hit_rate() * 100.0);
/// println!("Load factor: {:.2}", stats.load_factor());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct InternerStats {
    /// Number of interned strings
    pub count: usize,
    /// Hash map capacity (number of buckets)
    pub capacity: usize,
    /// Number of hash collisions encountered
    pub collisions: usize,
    /// Number of cache hits (string already interned)
    pub hits: usize,
    /// Number of cache misses (new string allocation)
    pub misses: usize,
}

impl InternerStats {
    /// Create new stats with the given values
    ///
    /// # Examples
    ///
    /// ```
    /// use gsc_util::symbol::InternerStats;
    ///
    /// let stats = InternerStats::new(100, 256, 5, 80, 20);
    /// assert_eq!(stats.count, 100);
    /// assert_eq!(stats.hits, 80);
    /// ```
    pub const fn new(
        count: usize,
        capacity: usize,
        collisions: usize,
        hits: usize,
        misses: usize,
    ) -> Self {
        Self {
            count,
            capacity,
            collisions,
            hits,
            misses,
        }
    }

    /// Calculate the load factor (count / capacity)
    ///
    /// Returns 0.0 if capacity is 0.
    ///
    /// A load factor above 0.75 indicates the hash map may need resizing.
    ///
    /// # Examples
    ///
    /// ```
    /// use gsc_util::symbol::InternerStats;
    ///
    /// let stats = InternerStats::new(100, 200, 0, 0, 0);
    /// assert_eq!(stats.load_factor(), 0.5);
    /// ```
    pub fn load_factor(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.count as f64 / self.capacity as f64
        }
    }

    /// Check if the interner is getting full (load factor > 0.75)
    ///
    /// # Examples
    ///
    /// ```
    /// use gsc_util::symbol::InternerStats;
    ///
    /// let stats = InternerStats::new(100, 200, 0, 0, 0);
    /// assert!(!stats.is_near_capacity());
    ///
    /// let stats = InternerStats::new(100, 120, 0, 0, 0);
    /// assert!(stats.is_near_capacity());
    /// ```
    pub fn is_near_capacity(&self) -> bool {
        self.load_factor() > 0.75
    }

    /// Calculate the hit rate (hits / (hits + misses))
    ///
    /// Returns 0.0 if no lookups have been performed.
    ///
    /// A high hit rate (>0.9) indicates good interning efficiency.
    ///
    /// # Examples
    ///
    /// ```
    /// use gsc_util::symbol::InternerStats;
    ///
    /// let stats = InternerStats::new(100, 200, 0, 90, 10);
    /// assert_eq!(stats.hit_rate(), 0.9);
    /// ```
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Get total number of interning operations
    ///
    /// # Examples
    ///
    /// ```
    /// use gsc_util::symbol::InternerStats;
    ///
    /// let stats = InternerStats::new(100, 200, 0, 90, 10);
    /// assert_eq!(stats.total_operations(), 100);
    /// ```
    pub fn total_operations(&self) -> usize {
        self.hits + self.misses
    }

    /// Get memory efficiency ratio (unique strings / total operations)
    ///
    /// Lower values indicate better deduplication.
    ///
    /// # Examples
    ///
    /// ```
    /// use gsc_util::symbol::InternerStats;
    ///
    /// let stats = InternerStats::new(10, 100, 0, 90, 10);
    /// assert_eq!(stats.memory_efficiency(), 0.1);  // 10 unique / 100 ops
    /// ```
    pub fn memory_efficiency(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.count as f64 / self.total_operations() as f64
        }
    }
}

/// Symbol - An interned string identifier
///
/// A Symbol is a compact (4-byte) handle to a string stored in a global
/// string table. This enables O(1) string comparison and reduces memory
/// usage when the same string appears multiple times (mangled function
/// names in particular repeat heavily across a module).
///
/// # Size
///
/// `Symbol` is exactly 4 bytes (u32), making it very cache-friendly compared
/// to `String` which is 24 bytes plus heap allocation.
///
/// # Thread Safety
///
/// Symbols are safe to share across threads (`Sync + Send`). The underlying
/// string table uses DashMap for lock-free concurrent access.
///
/// # Lifetime
///
/// Interned strings have `'static` lifetime and are never deallocated.
/// This is safe because the string table lives for the program duration.
///
/// # Examples
///
/// ```
/// use gsc_util::symbol::Symbol;
///
/// let keyword = Symbol::intern("spec");
/// let name = Symbol::intern("Main");
///
/// assert_eq!(keyword.as_str(), "spec");
/// assert_eq!(name.as_str(), "Main");
/// assert_eq!(keyword, Symbol::intern("spec"));  // O(1) comparison
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    /// Index into the global string table
    pub(crate) index: u32,
}

// ============================================================================
// KNOWN SYMBOLS (KEYWORDS, PRIMITIVE TYPE NAMES, SENTINELS)
// ============================================================================
//
/// Reserved symbol indices for known symbols.
///
/// All symbols with index < this value are pre-defined at compiler startup
/// and correspond to language keywords, primitive type names, and internal
/// sentinel identifiers.
const RESERVED_SYMBOLS_END: u32 = 512;

// ----------------------------------------------------------------------------
// Keywords (closed set per the grammar)
// ----------------------------------------------------------------------------

/// Known symbol for the `package` keyword
pub const KW_PACKAGE: Symbol = Symbol { index: 0 };
/// Known symbol for the `depends` keyword
pub const KW_DEPENDS: Symbol = Symbol { index: 1 };
/// Known symbol for the `spec` keyword
pub const KW_SPEC: Symbol = Symbol { index: 2 };
/// Known symbol for the `public` access modifier
pub const KW_PUBLIC: Symbol = Symbol { index: 3 };
/// Known symbol for the `concealed` access modifier
pub const KW_CONCEALED: Symbol = Symbol { index: 4 };
/// Known symbol for the `internal` access modifier
pub const KW_INTERNAL: Symbol = Symbol { index: 5 };
/// Known symbol for the `if` keyword
pub const KW_IF: Symbol = Symbol { index: 6 };
/// Known symbol for the `else` keyword
pub const KW_ELSE: Symbol = Symbol { index: 7 };
/// Known symbol for the `while` keyword
pub const KW_WHILE: Symbol = Symbol { index: 8 };
/// Known symbol for the `for` keyword
pub const KW_FOR: Symbol = Symbol { index: 9 };
/// Known symbol for the `return` keyword
pub const KW_RETURN: Symbol = Symbol { index: 10 };
/// Known symbol for the `get` keyword (property getter)
pub const KW_GET: Symbol = Symbol { index: 11 };
/// Known symbol for the `set` keyword (property setter)
pub const KW_SET: Symbol = Symbol { index: 12 };
/// Known symbol for the `construct` keyword
pub const KW_CONSTRUCT: Symbol = Symbol { index: 13 };
/// Known symbol for the `new` keyword
pub const KW_NEW: Symbol = Symbol { index: 14 };
/// Known symbol for the `default` keyword
pub const KW_DEFAULT: Symbol = Symbol { index: 15 };
/// Known symbol for the `true` literal
pub const KW_TRUE: Symbol = Symbol { index: 16 };
/// Known symbol for the `false` literal
pub const KW_FALSE: Symbol = Symbol { index: 17 };
/// Known symbol for the `this` keyword
pub const KW_THIS: Symbol = Symbol { index: 18 };

// ----------------------------------------------------------------------------
// Primitive type names
//
// These are NOT lexer keywords: the lexer hands them back as plain NAME
// tokens and the bottom symbol-table frame resolves them to built-in
// TypeSymbols. They are pre-interned here purely so semantic analysis can
// compare against them in O(1) without re-interning on every lookup.
// ----------------------------------------------------------------------------

/// Known symbol for the `int32` primitive type name
pub const TY_INT32: Symbol = Symbol { index: 19 };
/// Known symbol for the `int8` primitive type name
pub const TY_INT8: Symbol = Symbol { index: 20 };
/// Known symbol for the `float32` primitive type name
pub const TY_FLOAT32: Symbol = Symbol { index: 21 };
/// Known symbol for the `bool` primitive type name
pub const TY_BOOL: Symbol = Symbol { index: 22 };
/// Known symbol for the `string` primitive type name
pub const TY_STRING: Symbol = Symbol { index: 23 };

// ----------------------------------------------------------------------------
// Internal sentinels
// ----------------------------------------------------------------------------

/// Symbol for the `any-type` sentinel, used only as an internal placeholder
/// for the operand type of a parser-inserted unary minus. The leading `<`
/// makes this string unreachable from any valid NAME token, so it can never
/// collide with a user identifier.
pub const TY_ANY_TYPE: Symbol = Symbol { index: 24 };

impl Symbol {
    /// The maximum index value for a symbol
    pub const MAX_INDEX: u32 = u32::MAX;

    /// Intern a string, returning its symbol
    ///
    /// This function will:
    /// 1. Hash the string to check for existing entry
    /// 2. If found, return existing symbol (cache hit)
    /// 3. If not found, allocate new slot and return new symbol (cache miss)
    ///
    /// # Thread Safety
    ///
    /// This function is thread-safe. Multiple threads can intern strings
    /// concurrently using DashMap for lock-free access.
    ///
    /// # Performance
    ///
    /// - **Best case** (string already interned): O(1) hash lookup
    /// - **Worst case** (new unique string): O(1) hash insert + allocation
    ///
    /// # Examples
    ///
    /// ```
    /// use gsc_util::symbol::Symbol;
    ///
    /// let keyword = Symbol::intern("spec");
    /// let name = Symbol::intern("Main");
    ///
    /// // Interning the same string returns the same symbol
    /// assert_eq!(Symbol::intern("spec"), keyword);
    /// ```
    #[inline]
    pub fn intern(string: &str) -> Self {
        STRING_TABLE.intern(string)
    }

    /// Get the string value associated with this symbol
    ///
    /// # Performance
    ///
    /// O(n) where n is the number of interned strings, as we need to
    /// search the DashMap by index. This is a trade-off for better
    /// concurrent write performance.
    ///
    /// For hot paths, consider caching the string reference or using
    /// [`Symbol::eq_str()`] for comparisons.
    ///
    /// # Panics
    ///
    /// Returns empty string if the symbol is invalid (e.g., created manually
    /// with an out-of-bounds index).
    ///
    /// # Examples
    ///
    /// ```
    /// use gsc_util::symbol::Symbol;
    ///
    /// let sym = Symbol::intern("hello");
    /// assert_eq!(sym.as_str(), "hello");
    /// ```
    #[inline]
    pub fn as_str(&self) -> &'static str {
        STRING_TABLE.get(*self).unwrap_or("")
    }

    /// Check if the symbol's string is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Get the length of the symbol's string in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    /// Check if the symbol's string starts with a given prefix
    #[inline]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.as_str().starts_with(prefix)
    }

    /// Check if the symbol's string ends with a given suffix
    #[inline]
    pub fn ends_with(&self, suffix: &str) -> bool {
        self.as_str().ends_with(suffix)
    }

    /// Compare the symbol's string with a `&str` without allocation
    ///
    /// This is more efficient than `symbol.as_str() == other` when you
    /// only need equality comparison, as it can short-circuit early.
    ///
    /// # Examples
    ///
    /// ```
    /// use gsc_util::symbol::Symbol;
    ///
    /// let sym = Symbol::intern("hello");
    /// assert!(sym.eq_str("hello"));
    /// assert!(!sym.eq_str("world"));
    /// ```
    #[inline]
    pub fn eq_str(&self, other: &str) -> bool {
        self.as_str() == other
    }

    /// Returns true if this is a "known" symbol (keyword, primitive type
    /// name, or internal sentinel)
    ///
    /// Known symbols are interned at compiler startup and have indices
    /// in a reserved range (0 to `RESERVED_SYMBOLS_END`).
    ///
    /// # Examples
    ///
    /// ```
    /// use gsc_util::symbol::{Symbol, KW_SPEC};
    ///
    /// assert!(KW_SPEC.is_known());
    /// assert!(!Symbol::intern("my_variable").is_known());
    /// ```
    #[inline]
    pub fn is_known(&self) -> bool {
        self.index < RESERVED_SYMBOLS_END
    }

    /// Get the raw index value
    ///
    /// Useful for serialization or debugging.
    #[inline]
    pub fn as_u32(&self) -> u32 {
        self.index
    }

    /// Create a symbol from a raw index
    ///
    /// # Safety
    ///
    /// The index must correspond to a valid entry in the string table.
    /// Creating a symbol with an invalid index leads to undefined behavior
    /// when calling `as_str()`.
    #[inline]
    pub unsafe fn from_u32_unchecked(index: u32) -> Self {
        Self { index }
    }

    /// Get statistics about the string interner for profiling
    #[inline]
    pub fn stats_struct() -> InternerStats {
        STRING_TABLE.stats()
    }

    /// Get basic statistics about the string interner (legacy API)
    ///
    /// Returns a tuple of (number of interned strings, hash map capacity).
    /// For more detailed statistics, use [`Symbol::stats_struct`].
    #[inline]
    pub fn stats() -> (usize, usize) {
        let stats = Self::stats_struct();
        (stats.count, stats.capacity)
    }

    /// Intern a keyword or other reserved word, returning its pre-defined
    /// symbol if known.
    ///
    /// Unlike [`Symbol::intern`], this checks the reserved-word table first
    /// so that repeated lexing of the same keyword never allocates a new
    /// slot or touches the DashMap.
    ///
    /// # Examples
    ///
    /// ```
    /// use gsc_util::symbol::{Symbol, KW_SPEC};
    ///
    /// let spec_sym = Symbol::intern_known("spec");
    /// assert_eq!(spec_sym, KW_SPEC);
    ///
    /// // Unknown keywords are interned normally
    /// let unknown = Symbol::intern_known("not_a_keyword");
    /// assert!(!unknown.is_known());
    /// ```
    #[inline]
    pub fn intern_known(string: &str) -> Self {
        match string {
            "package" => KW_PACKAGE,
            "depends" => KW_DEPENDS,
            "spec" => KW_SPEC,
            "public" => KW_PUBLIC,
            "concealed" => KW_CONCEALED,
            "internal" => KW_INTERNAL,
            "if" => KW_IF,
            "else" => KW_ELSE,
            "while" => KW_WHILE,
            "for" => KW_FOR,
            "return" => KW_RETURN,
            "get" => KW_GET,
            "set" => KW_SET,
            "construct" => KW_CONSTRUCT,
            "new" => KW_NEW,
            "default" => KW_DEFAULT,
            "true" => KW_TRUE,
            "false" => KW_FALSE,
            "this" => KW_THIS,
            _ => Self::intern(string),
        }
    }

    /// Get the symbol for a primitive type name.
    ///
    /// Primitive type names are not lexer keywords (they are ordinary NAME
    /// tokens), but this gives the symbol table and IR generator a single
    /// O(1) path to recognize the five built-in types without re-interning.
    ///
    /// # Examples
    ///
    /// ```
    /// use gsc_util::symbol::{Symbol, TY_INT32, TY_STRING};
    ///
    /// assert_eq!(Symbol::intern_type("int32"), TY_INT32);
    /// assert_eq!(Symbol::intern_type("string"), TY_STRING);
    /// ```
    #[inline]
    pub fn intern_type(string: &str) -> Self {
        match string {
            "int32" => TY_INT32,
            "int8" => TY_INT8,
            "float32" => TY_FLOAT32,
            "bool" => TY_BOOL,
            "string" => TY_STRING,
            _ => Self::intern(string),
        }
    }
}

// ============================================================================
// TRAIT IMPLEMENTATIONS
// ============================================================================

impl std::fmt::Debug for Symbol {
    /// Format the symbol for debugging, showing the actual string content
    ///
    /// # Examples
    ///
    /// ```
    /// use gsc_util::symbol::Symbol;
    ///
    /// let sym = Symbol::intern("hello");
    /// assert_eq!(format!("{:?}", sym), "Symbol(hello)");
    /// ```
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.as_str())
    }
}

impl std::fmt::Display for Symbol {
    /// Format the symbol for display, showing just the string content
    ///
    /// # Examples
    ///
    /// ```
    /// use gsc_util::symbol::Symbol;
    ///
    /// let sym = Symbol::intern("hello");
    /// assert_eq!(format!("{}", sym), "hello");
    /// ```
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pretty-print a symbol with quotes for debugging
///
/// # Examples
///
/// ```
/// use gsc_util::symbol::{Symbol, SymbolPretty};
///
/// let sym = Symbol::intern("hello");
/// assert_eq!(format!("{}", sym.pretty()), "\"hello\"");
/// ```
pub trait SymbolPretty {
    /// Get a pretty-printed version with quotes
    fn pretty(&self) -> SymbolPrettyDisplay<'_>;
}

impl SymbolPretty for Symbol {
    fn pretty(&self) -> SymbolPrettyDisplay<'_> {
        SymbolPrettyDisplay(self)
    }
}

/// Display wrapper for pretty-printing symbols with quotes
pub struct SymbolPrettyDisplay<'a>(&'a Symbol);

impl std::fmt::Display for SymbolPrettyDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.0.as_str())
    }
}

impl std::fmt::Debug for SymbolPrettyDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SymbolPretty(\"{}\")", self.0.as_str())
    }
}

// Ensure Symbol is thread-safe
static_assertions::assert_impl_all!(Symbol: Send, Sync);
