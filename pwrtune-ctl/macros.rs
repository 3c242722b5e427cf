//! Declarative macros shared across the pwrtune crate

/// Define a closed enum where every variant carries a CLI name and a
/// hardware code
///
/// # Example
/// ```
/// use pwrtune::coded_enum;
///
/// coded_enum! {
///     pub enum Domain: u8 {
///         Package => ("package", 0),
///         Dram => ("dram", 1),
///     }
/// }
///
/// let domain = Domain::Dram;
/// assert_eq!(domain.name(), "dram");
/// assert_eq!(domain.code(), 1);
/// assert_eq!(Domain::from_name("package"), Some(Domain::Package));
/// assert_eq!(Domain::from_code(7), None);
/// assert_eq!(Domain::all().len(), 2);
/// ```
///
/// Expands to:
/// - An enum with Debug, Clone, Copy, PartialEq, Eq, Hash derives
/// - `name()`, `code()`, `all()`, `from_name()` and `from_code()`
/// - A `Display` impl printing the name
#[macro_export]
macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident: $code_type:ty {
            $($variant:ident => ($str:literal, $code:expr)),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant,)*
        }

        impl $name {
            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $str,)*
                }
            }

            pub fn code(&self) -> $code_type {
                match self {
                    $($name::$variant => $code,)*
                }
            }

            pub fn all() -> Vec<$name> {
                vec![$($name::$variant,)*]
            }

            pub fn from_name(name: &str) -> Option<$name> {
                Self::all().into_iter().find(|v| v.name() == name)
            }

            pub fn from_code(code: $code_type) -> Option<$name> {
                Self::all().into_iter().find(|v| v.code() == code)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}
