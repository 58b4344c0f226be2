/// Configuration macro for single-declaration config sections
///
/// `config_struct!` declares a section struct where every field carries its
/// default inline. It generates:
/// - The struct with public fields
/// - The `Default` implementation from the inline values
/// - Serde support with `#[serde(default)]`, so partial TOML files work
///
/// # Example
/// ```rust,ignore
/// config_struct! {
///     pub struct RunnerConfig {
///         transaction_delay_ms: u64 = 1_000,
///         daily_interval_secs: u64 = 86_400,
///     }
/// }
/// ```
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_name:ident: $field_type:ty = $default_value:expr
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }
    };
}
