/// Builds a `Vec<ParamSpec>` from `name: Type` entries.
///
/// Prefix an entry with `optional` to make it optional and append
/// `=> "text"` to describe it. Types are [`ParamType`](crate::ParamType)
/// variant names.
///
/// ```rust
/// use radiant::{ParamType, tool_params};
///
/// let params = tool_params![
///     ticker: String => "Ticker symbol, e.g. BTC",
///     optional limit: Integer,
/// ];
///
/// assert_eq!(params.len(), 2);
/// assert_eq!(params[0].ty, ParamType::String);
/// assert!(params[0].required);
/// assert_eq!(params[0].description.as_deref(), Some("Ticker symbol, e.g. BTC"));
/// assert!(!params[1].required);
/// ```
#[macro_export]
macro_rules! tool_params {
    (@acc [$($out:expr,)*]) => {
        vec![$($out,)*]
    };
    (@acc [$($out:expr,)*] optional $name:ident : $ty:ident $(=> $desc:expr)? $(, $($rest:tt)*)?) => {
        $crate::tool_params!(
            @acc [
                $($out,)*
                $crate::ParamSpec::optional(stringify!($name), $crate::ParamType::$ty)
                    $(.with_description($desc))?,
            ]
            $($($rest)*)?
        )
    };
    (@acc [$($out:expr,)*] $name:ident : $ty:ident $(=> $desc:expr)? $(, $($rest:tt)*)?) => {
        $crate::tool_params!(
            @acc [
                $($out,)*
                $crate::ParamSpec::required(stringify!($name), $crate::ParamType::$ty)
                    $(.with_description($desc))?,
            ]
            $($($rest)*)?
        )
    };
    () => {
        Vec::<$crate::ParamSpec>::new()
    };
    ($($input:tt)+) => {
        $crate::tool_params!(@acc [] $($input)+)
    };
}
