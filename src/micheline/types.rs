use crate::error::DecodeError;
use serde_json::Value;

/// A Micheline type expression with its field annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct MichelineType {
    pub prim: String,
    pub args: Vec<MichelineType>,
    pub field: Option<String>,
}

impl MichelineType {
    pub fn parse(raw: &Value) -> Result<Self, DecodeError> {
        let obj = raw
            .as_object()
            .ok_or_else(|| DecodeError::Malformed(format!("type node is not an object: {raw}")))?;
        let prim = obj
            .get("prim")
            .and_then(Value::as_str)
            .ok_or_else(|| DecodeError::Malformed(format!("type node has no prim: {raw}")))?
            .to_string();
        let args = match obj.get("args") {
            Some(Value::Array(items)) => items
                .iter()
                .map(Self::parse)
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(DecodeError::Malformed(format!(
                    "type args are not a sequence: {other}"
                )))
            }
            None => Vec::new(),
        };
        let field = obj
            .get("annots")
            .and_then(Value::as_array)
            .and_then(|annots| {
                annots
                    .iter()
                    .filter_map(Value::as_str)
                    .find_map(|annot| annot.strip_prefix('%'))
            })
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        Ok(Self { prim, args, field })
    }

    pub fn is_pair(&self) -> bool {
        self.prim == "pair"
    }

    pub fn arg(&self, index: usize) -> Result<&MichelineType, DecodeError> {
        self.args.get(index).ok_or_else(|| {
            DecodeError::Malformed(format!("type `{}` is missing argument {index}", self.prim))
        })
    }

    /// Splits `pair a b c ...` into `(a, pair b c ...)`. The synthetic tail is
    /// unannotated so its fields merge into the enclosing record.
    pub fn split_pair(&self) -> Result<(MichelineType, MichelineType), DecodeError> {
        match self.args.len() {
            0 | 1 => Err(DecodeError::Malformed(format!(
                "pair type with {} argument(s)",
                self.args.len()
            ))),
            2 => Ok((self.args[0].clone(), self.args[1].clone())),
            _ => Ok((
                self.args[0].clone(),
                MichelineType {
                    prim: "pair".to_string(),
                    args: self.args[1..].to_vec(),
                    field: None,
                },
            )),
        }
    }
}
