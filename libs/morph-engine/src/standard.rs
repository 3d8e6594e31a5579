use std::any::Any;
use std::fmt::Display;
use std::str::FromStr;

use serde_json::Value as Json;

use morph_api::BoxError;

use crate::catalog::Catalog;

macro_rules! widen {
    ($catalog:expr, $from:ty => $($to:ty),+ $(,)?) => {
        $( $catalog.insert_total(|v: &$from| <$to>::from(*v)); )+
    };
}

macro_rules! for_types {
    ($f:ident, $catalog:expr; $($t:ty),+ $(,)?) => {
        $( $f::<$t>($catalog); )+
    };
}

// ═══════════════════════════════════════════════════════════════
//  Numeric widening
// ═══════════════════════════════════════════════════════════════

/// Every lossless widening std provides a `From` impl for.
pub(crate) fn numeric_widening(catalog: &mut Catalog) {
    widen!(catalog, i8 => i16, i32, i64, i128, isize, f32, f64);
    widen!(catalog, i16 => i32, i64, i128, isize, f32, f64);
    widen!(catalog, i32 => i64, i128, f64);
    widen!(catalog, i64 => i128);
    widen!(catalog, u8 => u16, u32, u64, u128, usize, i16, i32, i64, i128, isize, f32, f64);
    widen!(catalog, u16 => u32, u64, u128, usize, i32, i64, i128, f32, f64);
    widen!(catalog, u32 => u64, u128, i64, i128, f64);
    widen!(catalog, u64 => u128, i128);
    widen!(catalog, f32 => f64);
}

// ═══════════════════════════════════════════════════════════════
//  Text: FromStr / Display
// ═══════════════════════════════════════════════════════════════

pub(crate) fn string_parsing(catalog: &mut Catalog) {
    catalog.insert_total(|s: &&'static str| s.to_string());
    for_types!(text, catalog;
        i8, i16, i32, i64, i128, isize,
        u8, u16, u32, u64, u128, usize,
        f32, f64, bool, char,
    );
}

fn text<P>(catalog: &mut Catalog)
where
    P: FromStr + Display + Any + Send + Sync,
    P::Err: Into<BoxError>,
{
    catalog.insert(|s: &String| s.parse::<P>());
    catalog.insert(|s: &&'static str| s.parse::<P>());
    catalog.insert_total(|v: &P| v.to_string());
}

// ═══════════════════════════════════════════════════════════════
//  Single-element containers
// ═══════════════════════════════════════════════════════════════

pub(crate) fn containers(catalog: &mut Catalog) {
    for_types!(single, catalog;
        i8, i16, i32, i64, i128, isize,
        u8, u16, u32, u64, u128, usize,
        f32, f64, bool, char, String,
    );
}

fn single<P: Any + Send + Sync + Clone>(catalog: &mut Catalog) {
    catalog.insert_total(|v: &P| vec![v.clone()]);
    catalog.insert(|v: &Vec<P>| match v.as_slice() {
        [one] => Ok(one.clone()),
        _ => Err(format!("expected exactly one element, got {}", v.len())),
    });
    catalog.insert_total(|v: &P| Some(v.clone()));
    catalog.insert(|v: &Option<P>| v.clone().ok_or("value is None"));
}

// ═══════════════════════════════════════════════════════════════
//  JSON
// ═══════════════════════════════════════════════════════════════

/// `serde_json::Value` ↔ JSON text and scalars.
pub(crate) fn json(catalog: &mut Catalog) {
    catalog.insert(|v: &Json| serde_json::to_string(v));
    catalog.insert(|s: &String| serde_json::from_str::<Json>(s));

    catalog.insert_total(|n: &i64| Json::from(*n));
    catalog.insert(|v: &Json| v.as_i64().ok_or_else(|| format!("not an i64: {v}")));

    catalog.insert_total(|n: &u64| Json::from(*n));
    catalog.insert(|v: &Json| v.as_u64().ok_or_else(|| format!("not a u64: {v}")));

    catalog.insert_total(|n: &f64| Json::from(*n));
    catalog.insert(|v: &Json| v.as_f64().ok_or_else(|| format!("not a number: {v}")));

    catalog.insert_total(|b: &bool| Json::Bool(*b));
    catalog.insert(|v: &Json| v.as_bool().ok_or_else(|| format!("not a bool: {v}")));
}
