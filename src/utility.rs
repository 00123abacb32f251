use crate::case::Case;
use std::any::type_name;

pub fn short_type_name<T>() -> &'static str {
    let name = type_name::<T>();
    let name = name.split('<').next().unwrap_or(name);
    name.rsplit("::").next().unwrap_or(name)
}

/// Metavar shown for values parsed with [`std::str::FromStr`], such as `U32` or `IP_ADDR`.
pub fn type_metavar<T>() -> String {
    Case::Snake { upper: true }.convert(short_type_name::<T>())
}
