use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// One die thrown by the dice service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll {
    /// Number of faces on the die.
    pub dice: Number,
    pub value: Number,
}

/// Renders a JSON number the way JavaScript prints it: integral floats lose
/// their fraction (`7.0` is `7`), other values print as-is.
#[must_use]
pub fn display_number(number: &Number) -> String {
    match number.as_f64() {
        Some(value) if number.is_f64() => value.to_string(),
        _ => number.to_string(),
    }
}

/// Instruction echoed back by the dice service.
///
/// Older deployments answer with the raw notation string, newer ones with the
/// parsed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Instruction {
    Notation(String),
    Parsed(ParsedInstruction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedInstruction {
    pub num: u32,
    pub die: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<i64>,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Notation(notation) => f.write_str(notation),
            Instruction::Parsed(parsed) => fmt::Display::fmt(parsed, f),
        }
    }
}

impl fmt::Display for ParsedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.num, self.die)?;
        // Always "+ N", negative modifiers included.
        if let Some(modifier) = self.modifier {
            write!(f, "+ {modifier}")?;
        }
        Ok(())
    }
}

/// Payload returned by the dice service for a successful roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    pub total: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<Instruction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rolls: Vec<Roll>,
}

/// Body the dice service sends alongside a non-success status.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_total_only_payload() {
        let result: RollResult = serde_json::from_value(json!({ "total": 7 })).unwrap();
        assert_eq!(result.total, Number::from(7));
        assert!(result.instruction.is_none());
        assert!(result.rolls.is_empty());
    }

    #[test]
    fn test_notation_instruction_payload() {
        let result: RollResult = serde_json::from_value(json!({
            "total": 7,
            "instruction": "2d6",
            "rolls": [{ "dice": 6, "value": 3 }, { "dice": 6, "value": 4 }]
        }))
        .unwrap();

        assert_eq!(result.instruction, Some(Instruction::Notation("2d6".into())));
        assert_eq!(result.rolls.len(), 2);
    }

    #[test]
    fn test_parsed_instruction_payload() {
        let result: RollResult = serde_json::from_value(json!({
            "total": 12,
            "instruction": { "num": 3, "die": 6, "modifier": 2 },
            "rolls": []
        }))
        .unwrap();

        assert_eq!(
            result.instruction,
            Some(Instruction::Parsed(ParsedInstruction {
                num: 3,
                die: 6,
                modifier: Some(2)
            }))
        );
    }

    #[test]
    fn test_parsed_instruction_display() {
        let with_modifier = ParsedInstruction {
            num: 3,
            die: 6,
            modifier: Some(2),
        };
        assert_eq!(with_modifier.to_string(), "3d6+ 2");

        let negative = ParsedInstruction {
            num: 1,
            die: 20,
            modifier: Some(-1),
        };
        assert_eq!(negative.to_string(), "1d20+ -1");

        let plain = ParsedInstruction {
            num: 2,
            die: 8,
            modifier: None,
        };
        assert_eq!(plain.to_string(), "2d8");
    }

    #[test]
    fn test_rolls_keep_order_through_serialization() {
        let raw = json!([
            { "dice": 20, "value": 17 },
            { "dice": 4, "value": 1 },
            { "dice": 20, "value": 2 },
            { "dice": 6, "value": 6 }
        ]);

        let rolls: Vec<Roll> = serde_json::from_value(raw.clone()).unwrap();
        let reserialized = serde_json::to_value(&rolls).unwrap();

        assert_eq!(reserialized, raw);
        assert_eq!(
            rolls
                .iter()
                .map(|r| (r.dice.as_u64().unwrap(), r.value.as_u64().unwrap()))
                .collect::<Vec<_>>(),
            vec![(20, 17), (4, 1), (20, 2), (6, 6)]
        );
    }

    #[test]
    fn test_fractional_numbers_decode() {
        let result: RollResult = serde_json::from_value(json!({
            "total": 7.0,
            "rolls": [{ "dice": 6.0, "value": 3.5 }]
        }))
        .unwrap();

        assert_eq!(display_number(&result.total), "7");
        assert_eq!(display_number(&result.rolls[0].dice), "6");
        assert_eq!(display_number(&result.rolls[0].value), "3.5");
    }

    #[test]
    fn test_display_number_keeps_integers() {
        assert_eq!(display_number(&Number::from(-3)), "-3");
        assert_eq!(display_number(&Number::from(u64::MAX)), u64::MAX.to_string());
        let half = Number::from_f64(7.5).unwrap();
        assert_eq!(display_number(&half), "7.5");
    }
}
