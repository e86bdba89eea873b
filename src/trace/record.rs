use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Kind of control-flow transfer a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    Direct,
    Return,
    IndirectCall,
    IndirectJump,
    Other,
}

impl TransferKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferKind::Direct => "direct",
            TransferKind::Return => "ret",
            TransferKind::IndirectCall => "icall",
            TransferKind::IndirectJump => "ijmp",
            TransferKind::Other => "other",
        }
    }
}

impl FromStr for TransferKind {
    type Err = std::convert::Infallible;

    /// Unknown mnemonics map to [`TransferKind::Other`]; they can never
    /// terminate a counted window.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "ret" | "return" => TransferKind::Return,
            "icall" | "indirect_call" => TransferKind::IndirectCall,
            "ijmp" | "indirect_jump" => TransferKind::IndirectJump,
            "direct" | "call" | "jmp" | "jcc" | "d" => TransferKind::Direct,
            _ => TransferKind::Other,
        })
    }
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One control-flow transfer taken by the traced program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransferRecord {
    pub source: u64,
    pub target: Option<u64>,
    pub kind: TransferKind,
}

impl TransferRecord {
    pub fn new(source: u64, kind: TransferKind) -> Self {
        Self {
            source,
            target: None,
            kind,
        }
    }

    /// Parse one trace line: `source,target,kind` or `source,kind`.
    ///
    /// Returns `Ok(None)` for blank lines and `#` comments.
    pub fn parse_line(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let (source, target, kind) = match fields.as_slice() {
            [source, kind] => (*source, None, *kind),
            [source, target, kind] => (*source, Some(*target), *kind),
            _ => {
                return Err(format!(
                    "expected 2 or 3 comma separated fields, got {}",
                    fields.len()
                ));
            }
        };

        let source = parse_address(source)?;
        let target = target.map(parse_address).transpose()?;
        let kind = kind.parse().unwrap_or(TransferKind::Other);

        Ok(Some(Self {
            source,
            target,
            kind,
        }))
    }
}

fn parse_address(field: &str) -> Result<u64, String> {
    let digits = field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
        .unwrap_or(field);
    u64::from_str_radix(digits, 16)
        .map_err(|e| format!("invalid address '{field}': {e}"))
}
