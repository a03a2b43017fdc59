/// Перечисление с фиксированными строковыми кодами (как они хранятся в БД и ходят по API)
macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($code:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            /// Код значения
            pub fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            /// Человекочитаемое название
            pub fn display_name(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn all() -> Vec<$name> {
                vec![$($name::$variant),+]
            }

            /// Парсинг из строки (строгое совпадение кода)
            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

pub mod alert;
pub mod problem;
pub mod report_status;
pub mod work_status;

pub use alert::{AlertKind, AlertLevel, AlertStatus};
pub use problem::{ProblemStatus, Severity, SolutionStatus};
pub use report_status::ReportStatus;
pub use work_status::WorkStatus;
