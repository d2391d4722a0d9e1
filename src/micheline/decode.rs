//! Storage decoder: walks a Micheline value alongside its type and produces a
//! `StorageMapping` keyed by field annotation.
//!
//! Right-comb pairs are flattened into one record. Unannotated pair members are
//! merged into the enclosing record; unannotated leaves are named by position.

use super::types::MichelineType;
use super::value::{StorageMapping, StorageValue};
use crate::error::DecodeError;
use crate::tezos::AccountId;
use serde_json::{json, Value};
use std::borrow::Cow;

pub fn decode_storage(raw: &Value, storage_type: &Value) -> Result<StorageMapping, DecodeError> {
    let ty = MichelineType::parse(storage_type)?;
    if !ty.is_pair() {
        return Err(DecodeError::NotRecord(format!(
            "storage type is `{}`, expected a pair",
            ty.prim
        )));
    }
    let mut record = RecordBuilder::default();
    decode_pair_into(raw, &ty, "storage", &mut record)?;
    Ok(record.finish())
}

#[derive(Default)]
struct RecordBuilder {
    mapping: StorageMapping,
    position: usize,
}

impl RecordBuilder {
    fn next_name(&mut self, field: Option<&str>) -> String {
        let name = match field {
            Some(field) => field.to_string(),
            None => self.position.to_string(),
        };
        self.position += 1;
        name
    }

    fn finish(self) -> StorageMapping {
        self.mapping
    }
}

fn decode_pair_into(
    value: &Value,
    ty: &MichelineType,
    path: &str,
    record: &mut RecordBuilder,
) -> Result<(), DecodeError> {
    let (left_ty, right_ty) = ty.split_pair()?;
    let (left, right) = split_pair_value(value, path)?;
    decode_member(&left, &left_ty, path, record)?;
    decode_member(&right, &right_ty, path, record)
}

fn decode_member(
    value: &Value,
    ty: &MichelineType,
    path: &str,
    record: &mut RecordBuilder,
) -> Result<(), DecodeError> {
    if ty.is_pair() && ty.field.is_none() {
        return decode_pair_into(value, ty, path, record);
    }
    let name = record.next_name(ty.field.as_deref());
    let decoded = decode_value(value, ty, &format!("{path}.{name}"))?;
    record.mapping.insert(name, decoded);
    Ok(())
}

/// Accepts `Pair a b ...` and the sequence shorthand `{ a ; b ; ... }`.
fn split_pair_value<'a>(
    value: &'a Value,
    path: &str,
) -> Result<(Cow<'a, Value>, Cow<'a, Value>), DecodeError> {
    let items = match prim_of(value) {
        Some(("Pair", args)) => args,
        _ => match value.as_array() {
            Some(items) => items.as_slice(),
            None => return Err(mismatch("pair", path)),
        },
    };
    match items.len() {
        0 | 1 => Err(mismatch("pair", path)),
        2 => Ok((Cow::Borrowed(&items[0]), Cow::Borrowed(&items[1]))),
        _ => Ok((
            Cow::Borrowed(&items[0]),
            Cow::Owned(json!({ "prim": "Pair", "args": items[1..].to_vec() })),
        )),
    }
}

fn decode_value(value: &Value, ty: &MichelineType, path: &str) -> Result<StorageValue, DecodeError> {
    match ty.prim.as_str() {
        "pair" => {
            let mut record = RecordBuilder::default();
            decode_pair_into(value, ty, path, &mut record)?;
            Ok(StorageValue::Record(record.finish()))
        }
        "option" => match prim_of(value) {
            Some(("None", [])) => Ok(StorageValue::Option(None)),
            Some(("Some", [inner])) => Ok(StorageValue::Option(Some(Box::new(decode_value(
                inner,
                ty.arg(0)?,
                path,
            )?)))),
            _ => Err(mismatch("option", path)),
        },
        "or" => match prim_of(value) {
            Some(("Left", [inner])) => decode_branch(inner, ty.arg(0)?, "Left", path),
            Some(("Right", [inner])) => decode_branch(inner, ty.arg(1)?, "Right", path),
            _ => Err(mismatch("or", path)),
        },
        "list" | "set" => {
            let items = value.as_array().ok_or_else(|| mismatch(&ty.prim, path))?;
            let elem_ty = ty.arg(0)?;
            items
                .iter()
                .enumerate()
                .map(|(idx, item)| decode_value(item, elem_ty, &format!("{path}[{idx}]")))
                .collect::<Result<Vec<_>, _>>()
                .map(StorageValue::List)
        }
        "map" => decode_map(value, ty, path),
        "big_map" => match int_literal(value) {
            Some(id) => Ok(StorageValue::Int(id.to_string())),
            None => decode_map(value, ty, path),
        },
        "address" | "contract" => decode_address(value, path),
        "int" | "nat" | "mutez" => int_literal(value)
            .map(|n| StorageValue::Int(n.to_string()))
            .ok_or_else(|| mismatch(&ty.prim, path)),
        "timestamp" => match (int_literal(value), string_literal(value)) {
            (Some(n), _) => Ok(StorageValue::Int(n.to_string())),
            (None, Some(s)) => Ok(StorageValue::String(s.to_string())),
            _ => Err(mismatch("timestamp", path)),
        },
        "string" | "key" | "key_hash" | "signature" | "chain_id" => {
            match (string_literal(value), bytes_literal(value)) {
                (Some(s), _) => Ok(StorageValue::String(s.to_string())),
                (None, Some(hex)) => decode_hex(hex, path).map(StorageValue::Bytes),
                _ => Err(mismatch(&ty.prim, path)),
            }
        }
        "bytes" => bytes_literal(value)
            .ok_or_else(|| mismatch("bytes", path))
            .and_then(|hex| decode_hex(hex, path))
            .map(StorageValue::Bytes),
        "bool" => match prim_of(value) {
            Some(("True", [])) => Ok(StorageValue::Bool(true)),
            Some(("False", [])) => Ok(StorageValue::Bool(false)),
            _ => Err(mismatch("bool", path)),
        },
        "unit" => match prim_of(value) {
            Some(("Unit", [])) => Ok(StorageValue::Unit),
            _ => Err(mismatch("unit", path)),
        },
        _ => Ok(StorageValue::Opaque(value.clone())),
    }
}

fn decode_branch(
    value: &Value,
    ty: &MichelineType,
    default_name: &str,
    path: &str,
) -> Result<StorageValue, DecodeError> {
    let name = ty.field.as_deref().unwrap_or(default_name);
    let decoded = decode_value(value, ty, &format!("{path}.{name}"))?;
    let mut mapping = StorageMapping::new();
    mapping.insert(name, decoded);
    Ok(StorageValue::Record(mapping))
}

fn decode_map(value: &Value, ty: &MichelineType, path: &str) -> Result<StorageValue, DecodeError> {
    let items = value.as_array().ok_or_else(|| mismatch(&ty.prim, path))?;
    let (key_ty, val_ty) = (ty.arg(0)?, ty.arg(1)?);
    let mut entries = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let elem_path = format!("{path}[{idx}]");
        let Some(("Elt", [key, val])) = prim_of(item) else {
            return Err(mismatch("Elt", &elem_path));
        };
        entries.push((
            decode_value(key, key_ty, &elem_path)?,
            decode_value(val, val_ty, &elem_path)?,
        ));
    }
    Ok(StorageValue::Map(entries))
}

fn decode_address(value: &Value, path: &str) -> Result<StorageValue, DecodeError> {
    let parsed = if let Some(text) = string_literal(value) {
        let account = text.split_once('%').map_or(text, |(account, _)| account);
        AccountId::parse(account)
    } else if let Some(hex) = bytes_literal(value) {
        AccountId::from_binary(&decode_hex(hex, path)?)
    } else {
        return Err(mismatch("address", path));
    };
    parsed
        .map(StorageValue::Address)
        .map_err(|e| DecodeError::Malformed(format!("{path}: {e}")))
}

fn prim_of(value: &Value) -> Option<(&str, &[Value])> {
    let obj = value.as_object()?;
    let prim = obj.get("prim")?.as_str()?;
    let args = obj
        .get("args")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    Some((prim, args))
}

fn int_literal(value: &Value) -> Option<&str> {
    value.get("int")?.as_str()
}

fn string_literal(value: &Value) -> Option<&str> {
    value.get("string")?.as_str()
}

fn bytes_literal(value: &Value) -> Option<&str> {
    value.get("bytes")?.as_str()
}

fn decode_hex(raw: &str, path: &str) -> Result<Vec<u8>, DecodeError> {
    hex::decode(raw).map_err(|e| DecodeError::Malformed(format!("{path}: bad bytes literal: {e}")))
}

fn mismatch(expected: &str, path: &str) -> DecodeError {
    DecodeError::ShapeMismatch {
        expected: expected.to_string(),
        path: path.to_string(),
    }
}
