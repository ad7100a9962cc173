macro_rules! impl_error {
    ($(
        $string:literal <=> $variant:ident,
    )*) => {
        /// All recoverable conditions the parser reports through the error
        /// callback.
        ///
        /// Parsing itself never fails; these only describe input the parser
        /// had to repair. Every other malformation (bogus comments, unmatched
        /// close tags, stray `<`, unterminated attributes) is recovered
        /// silently.
        #[derive(Debug, Eq, PartialEq, Clone, Copy)]
        pub enum Error {
            $(
                #[doc = concat!("The `", $string, "` condition.")]
                $variant
            ),*
        }

        impl std::str::FromStr for Error {
            type Err = ();

            /// Parse a `kebab-case` error code into an enum variant.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $string => Ok(Self::$variant), )*
                    _ => Err(())
                }
            }
        }

        impl Error {
            /// Convert an enum variant back into its `kebab-case` error code.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match *self {
                    $( Self::$variant => $string, )*
                }
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_str().fmt(f)
    }
}

impl_error! {
    "tag-not-closed" <=> TagNotClosed,
}
