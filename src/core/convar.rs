//! Console variable (ConVar) implementation.
//!
//! A ConVar is a named view onto a [`VarCell`] owned by the code that
//! registers it. The registry keeps a type-erased [`ConVarDyn`] so variables
//! of different types share one table, while typed access stays checked.

use std::any::Any;
use std::fmt::{self, Display};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{Token, TokenKind};

/// Flags controlling ConVar behavior.
///
/// Fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConVarFlags(u32);

impl ConVarFlags {
    /// No flags set.
    pub const DEFAULT: Self = Self(0);

    /// Can only be changed while developer mode is enabled.
    pub const DEVELOPER: Self = Self(1 << 1);

    /// Cannot be changed from the console.
    pub const READ_ONLY: Self = Self(1 << 2);

    /// Registration is skipped entirely.
    pub const UNREGISTERED: Self = Self(1 << 3);

    /// Check if a flag is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Combine two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check if no flags are set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl std::ops::BitOr for ConVarFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for ConVarFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

/// Trait for types that can be stored in a ConVar.
///
/// `parse` constructs a value from string tokens. Numeric and boolean tokens
/// go through `from_int_text` / `from_decimal_text`, which fall back to
/// `parse` for types without arithmetic coercion. Returning `None` rejects
/// the write and leaves the stored value untouched.
pub trait ConVarValue: Clone + Send + Sync + 'static {
    /// Parse a value from a string token.
    fn parse(s: &str) -> Option<Self>;

    /// Convert an integer token (digits, or `1`/`0` for booleans).
    fn from_int_text(s: &str) -> Option<Self> {
        Self::parse(s)
    }

    /// Convert a decimal token.
    fn from_decimal_text(s: &str) -> Option<Self> {
        Self::parse(s)
    }

    /// Format the value as a string.
    fn format(&self) -> String;

    /// Short type name used in error messages.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl ConVarValue for bool {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        }
    }

    fn from_int_text(s: &str) -> Option<Self> {
        s.parse::<i64>().ok().map(|v| v != 0)
    }

    fn from_decimal_text(s: &str) -> Option<Self> {
        s.parse::<f64>().ok().map(|v| v != 0.0)
    }

    fn format(&self) -> String {
        if *self { "1".to_string() } else { "0".to_string() }
    }

    fn type_name() -> &'static str {
        "bool"
    }
}

macro_rules! impl_integer_value {
    ($($ty:ty),* $(,)?) => {$(
        impl ConVarValue for $ty {
            fn parse(s: &str) -> Option<Self> {
                s.parse().ok()
            }

            // Truncates toward zero, out of range is rejected
            fn from_decimal_text(s: &str) -> Option<Self> {
                let value = s.parse::<f64>().ok()?.trunc();
                if value.is_finite() && value >= <$ty>::MIN as f64 && value <= <$ty>::MAX as f64 {
                    Some(value as $ty)
                } else {
                    None
                }
            }

            fn format(&self) -> String {
                self.to_string()
            }

            fn type_name() -> &'static str {
                stringify!($ty)
            }
        }
    )*};
}

impl_integer_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_float_value {
    ($($ty:ty),* $(,)?) => {$(
        impl ConVarValue for $ty {
            fn parse(s: &str) -> Option<Self> {
                s.parse().ok()
            }

            fn format(&self) -> String {
                // Avoid unnecessary decimal places
                if self.fract() == 0.0 {
                    format!("{:.0}", self)
                } else {
                    format!("{}", self)
                }
            }

            fn type_name() -> &'static str {
                stringify!($ty)
            }
        }
    )*};
}

impl_float_value!(f32, f64);

impl ConVarValue for String {
    fn parse(s: &str) -> Option<Self> {
        Some(s.to_string())
    }

    fn format(&self) -> String {
        self.clone()
    }

    fn type_name() -> &'static str {
        "String"
    }
}

/// Static strings can only be replaced from code, never from console text.
impl ConVarValue for &'static str {
    fn parse(_s: &str) -> Option<Self> {
        None
    }

    fn format(&self) -> String {
        self.to_string()
    }

    fn type_name() -> &'static str {
        "&str"
    }
}

/// Shared storage cell for a console variable.
///
/// The registering code keeps a handle and the registry keeps a clone, so
/// both read and write the same value. The lock only makes the cell
/// shareable; it does not order concurrent dispatches.
///
/// # Examples
///
/// ```
/// use bevy_console_dispatch::core::VarCell;
///
/// let speed = VarCell::new(200.0f32);
/// let view = speed.clone();
/// view.set(350.0);
/// assert_eq!(speed.get(), 350.0);
/// ```
#[derive(Debug, Default)]
pub struct VarCell<T>(Arc<RwLock<T>>);

impl<T> Clone for VarCell<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> VarCell<T> {
    /// Create a new cell holding `value`.
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    /// Borrow the value.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Borrow the value mutably.
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the value.
    pub fn set(&self, value: T) {
        *self.write() = value;
    }

    /// Check whether two handles point at the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: Clone> VarCell<T> {
    /// Get a copy of the current value.
    pub fn get(&self) -> T {
        self.read().clone()
    }
}

/// Callback fired with the new value after a successful console write.
pub type UpdateHook<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Type-erased trait for ConVar storage.
///
/// This allows storing ConVars of different types in the same registry.
pub trait ConVarDyn: Send + Sync {
    /// Get the current value as a string.
    fn get_string(&self) -> String;

    /// Convert the token to the variable's type and store it.
    ///
    /// Returns `false`, leaving the value unchanged, if the conversion fails.
    fn set_token(&self, token: &Token) -> bool;

    /// Run the update hook, if any, with the current value.
    fn notify_update(&self);

    /// Name of the stored value type.
    fn type_name(&self) -> &'static str;

    /// Get as Any for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// A console variable bound to a [`VarCell`].
///
/// # Examples
///
/// ```
/// use bevy_console_dispatch::core::{ConVar, ConVarFlags, VarCell};
///
/// let gravity = VarCell::new(800.0f32);
/// let cvar = ConVar::new("sv_gravity", gravity.clone())
///     .description("World gravity")
///     .flags(ConVarFlags::DEVELOPER);
///
/// assert_eq!(cvar.get(), 800.0);
/// gravity.set(600.0);
/// assert_eq!(cvar.get(), 600.0);
/// ```
pub struct ConVar<T: ConVarValue> {
    name: Box<str>,
    cell: VarCell<T>,
    description: String,
    flags: ConVarFlags,
    on_update: Option<UpdateHook<T>>,
}

impl<T: ConVarValue> Clone for ConVar<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            cell: self.cell.clone(),
            description: self.description.clone(),
            flags: self.flags,
            on_update: self.on_update.clone(),
        }
    }
}

impl<T: ConVarValue> ConVar<T> {
    /// Create a ConVar viewing `cell`.
    pub fn new(name: impl Into<Box<str>>, cell: VarCell<T>) -> Self {
        Self {
            name: name.into(),
            cell,
            description: String::new(),
            flags: ConVarFlags::DEFAULT,
            on_update: None,
        }
    }

    /// Set the description.
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Set the flags.
    pub fn flags(mut self, flags: ConVarFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the callback run after every successful console write.
    pub fn on_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.on_update = Some(Arc::new(hook));
        self
    }

    pub(crate) fn with_hook(mut self, hook: Option<UpdateHook<T>>) -> Self {
        self.on_update = hook;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the current value.
    #[inline]
    pub fn get(&self) -> T {
        self.cell.get()
    }

    /// The storage cell this variable views.
    #[inline]
    pub fn cell(&self) -> &VarCell<T> {
        &self.cell
    }

    #[inline]
    pub fn get_flags(&self) -> ConVarFlags {
        self.flags
    }

    #[inline]
    pub fn get_description(&self) -> &str {
        &self.description
    }
}

impl<T: ConVarValue> ConVarDyn for ConVar<T> {
    fn get_string(&self) -> String {
        self.cell.read().format()
    }

    fn set_token(&self, token: &Token) -> bool {
        let parsed = match token.kind() {
            TokenKind::String => T::parse(token.text()),
            TokenKind::Integer | TokenKind::BoolTrue | TokenKind::BoolFalse => {
                T::from_int_text(token.text())
            }
            TokenKind::Decimal => T::from_decimal_text(token.text()),
        };

        match parsed {
            Some(value) => {
                self.cell.set(value);
                true
            }
            None => false,
        }
    }

    fn notify_update(&self) {
        if let Some(hook) = &self.on_update {
            // Copy out so the hook may write the cell itself
            let value = self.cell.get();
            hook(&value);
        }
    }

    fn type_name(&self) -> &'static str {
        T::type_name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: ConVarValue> Display for ConVar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" = \"{}\"", self.name, self.get_string())?;
        if !self.description.is_empty() {
            write!(f, " - {}", self.description)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI32, Ordering};

    use super::*;

    fn set(cvar: &ConVar<impl ConVarValue>, text: &str, kind: TokenKind) -> bool {
        cvar.set_token(&Token::new(text, kind))
    }

    #[test]
    fn test_convar_basic() {
        let cvar = ConVar::new("test", VarCell::new(42i32));
        assert_eq!(cvar.get(), 42);
        assert_eq!(cvar.name(), "test");
        assert_eq!(cvar.get_string(), "42");
    }

    #[test]
    fn test_convar_shares_cell() {
        let cell = VarCell::new(String::from("cppstring"));
        let cvar = ConVar::new("test.string", cell.clone());

        assert!(set(&cvar, "hello cpp", TokenKind::String));
        assert_eq!(cell.get(), "hello cpp");
        assert!(cvar.cell().ptr_eq(&cell));
    }

    #[test]
    fn test_convar_integer_tokens() {
        let cvar = ConVar::new("test.integer", VarCell::new(123i32));

        assert!(set(&cvar, "12345", TokenKind::Integer));
        assert_eq!(cvar.get(), 12345);

        assert!(set(&cvar, "-5", TokenKind::String));
        assert_eq!(cvar.get(), -5);

        assert!(set(&cvar, "4.7", TokenKind::Decimal));
        assert_eq!(cvar.get(), 4);

        assert!(!set(&cvar, "abc", TokenKind::String));
        assert_eq!(cvar.get(), 4);
    }

    #[test]
    fn test_convar_integer_out_of_range() {
        let cvar = ConVar::new("test.uint", VarCell::new(200u8));

        assert!(!set(&cvar, "300", TokenKind::Integer));
        assert_eq!(cvar.get(), 200);

        assert!(!set(&cvar, "256.5", TokenKind::Decimal));
        assert_eq!(cvar.get(), 200);

        assert!(set(&cvar, "1", TokenKind::Integer));
        assert_eq!(cvar.get(), 1);
    }

    #[test]
    fn test_convar_float() {
        let cvar = ConVar::new("gravity", VarCell::new(800.0f32));
        assert_eq!(cvar.get_string(), "800");

        assert!(set(&cvar, "4.21", TokenKind::Decimal));
        assert_eq!(cvar.get(), 4.21f32);
        assert_eq!(cvar.get_string(), "4.21");

        assert!(set(&cvar, "64", TokenKind::Integer));
        assert_eq!(cvar.get(), 64.0);

        assert!(!set(&cvar, "fast", TokenKind::String));
        assert_eq!(cvar.get(), 64.0);
    }

    #[test]
    fn test_convar_bool() {
        let cvar = ConVar::new("enabled", VarCell::new(false));

        assert!(set(&cvar, "1", TokenKind::BoolTrue));
        assert!(cvar.get());
        assert_eq!(cvar.get_string(), "1");

        assert!(set(&cvar, "0", TokenKind::BoolFalse));
        assert!(!cvar.get());

        assert!(set(&cvar, "yes", TokenKind::String));
        assert!(cvar.get());

        assert!(!set(&cvar, "maybe", TokenKind::String));
        assert!(cvar.get());
    }

    #[test]
    fn test_convar_string_takes_numeric_text() {
        let cvar = ConVar::new("name", VarCell::new(String::new()));
        assert!(set(&cvar, "42", TokenKind::Integer));
        assert_eq!(cvar.get(), "42");
        assert!(set(&cvar, "1", TokenKind::BoolTrue));
        assert_eq!(cvar.get(), "1");
    }

    #[test]
    fn test_convar_static_str_rejects_text() {
        let cvar = ConVar::new("test.cstring", VarCell::new("mystr"));
        assert!(!set(&cvar, "other", TokenKind::String));
        assert_eq!(cvar.get(), "mystr");
        assert_eq!(cvar.get_string(), "mystr");
    }

    #[test]
    fn test_convar_update_hook() {
        let seen = Arc::new(AtomicI32::new(0));
        let seen_hook = Arc::clone(&seen);
        let cvar = ConVar::new("test", VarCell::new(1i32))
            .on_update(move |v| seen_hook.store(*v, Ordering::SeqCst));

        assert!(set(&cvar, "77", TokenKind::Integer));
        cvar.notify_update();
        assert_eq!(seen.load(Ordering::SeqCst), 77);
    }

    #[test]
    fn test_convar_dyn_downcast() {
        let cvar: Box<dyn ConVarDyn> = Box::new(ConVar::new("test", VarCell::new(42i32)));
        assert_eq!(cvar.type_name(), "i32");
        assert!(cvar.as_any().downcast_ref::<ConVar<i32>>().is_some());
        assert!(cvar.as_any().downcast_ref::<ConVar<f32>>().is_none());
    }

    #[test]
    fn test_convar_display() {
        let cvar = ConVar::new("sv_gravity", VarCell::new(800i32)).description("World gravity");
        assert_eq!(cvar.to_string(), "\"sv_gravity\" = \"800\" - World gravity");
    }

    #[test]
    fn test_convar_flags() {
        let flags = ConVarFlags::DEVELOPER | ConVarFlags::READ_ONLY;
        assert!(flags.contains(ConVarFlags::DEVELOPER));
        assert!(flags.contains(ConVarFlags::READ_ONLY));
        assert!(!flags.contains(ConVarFlags::UNREGISTERED));
        assert!(ConVarFlags::DEFAULT.is_empty());
        assert_eq!(flags.bits(), 0b110);
    }
}
