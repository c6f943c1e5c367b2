//! The `Project` record, create-request coercion, id generation, and the
//! sample dataset.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// A single project listing.
///
/// The store keeps these newest-first; `id` and `created` are stamped once
/// at creation and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub skills: String,
    pub desc: String,
    /// Milliseconds since the Unix epoch.
    pub created: i64,
    /// Optional owner identifier (e.g. a wallet address). Serialized as
    /// `null` when absent.
    #[serde(default)]
    pub owner: Option<String>,
}

/// A candidate project as submitted by a client, before validation.
///
/// Built from an untrusted JSON payload with every field coerced to a
/// string, so a numeric `budget` or boolean `skills` never panics a
/// handler.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub title: String,
    pub budget: String,
    pub skills: String,
    pub desc: String,
    pub owner: Option<String>,
}

impl NewProject {
    /// Extract a candidate from a wire payload.
    ///
    /// The payload must be a JSON object; individual fields are coerced,
    /// never trusted to match the `Project` shape.
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::InvalidInput("request body must be a JSON object".into()))?;

        Ok(Self {
            title: coerce_string(obj.get("title")),
            budget: coerce_string(obj.get("budget")),
            skills: coerce_string(obj.get("skills")),
            desc: coerce_string(obj.get("desc")),
            owner: obj.get("owner").and_then(coerce_optional_string),
        })
    }

    /// Validate the required fields and stamp `id` and `created`.
    ///
    /// Rejects with [`Error::InvalidInput`] when `title` or `desc` is empty
    /// after trimming, before any I/O happens.
    pub fn into_project(self) -> Result<Project> {
        let title = self.title.trim().to_string();
        let desc = self.desc.trim().to_string();

        if title.is_empty() {
            return Err(Error::InvalidInput("title is required".into()));
        }
        if desc.is_empty() {
            return Err(Error::InvalidInput("desc is required".into()));
        }

        Ok(Project {
            id: new_project_id(),
            title,
            budget: self.budget,
            skills: self.skills,
            desc,
            created: Utc::now().timestamp_millis(),
            owner: self.owner,
        })
    }
}

fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn coerce_optional_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a fresh project id.
///
/// Current millisecond timestamp in base36 plus a 6-character random
/// suffix. Effectively unique without a registry lookup; ids generated in
/// the same millisecond differ in the suffix.
pub fn new_project_id() -> String {
    let mut id = encode_base36(Utc::now().timestamp_millis() as u64);
    let mut rng = rand::thread_rng();
    for _ in 0..6 {
        id.push(BASE36[rng.gen_range(0..BASE36.len())] as char);
    }
    id
}

fn encode_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    // BASE36 bytes are ASCII, so this cannot fail.
    String::from_utf8(digits).unwrap_or_default()
}

const DAY_MS: i64 = 86_400_000;

/// The fixed three-record seed set.
///
/// Used for first-run initialization, as the fallback when the store file
/// is unreadable, and for explicit reset. `created` offsets are recomputed
/// relative to now on every call.
pub fn sample_projects() -> Vec<Project> {
    let now = Utc::now().timestamp_millis();
    vec![
        Project {
            id: "seed-token-sale".to_string(),
            title: "Token sale smart contract".to_string(),
            budget: "3,000 - 5,000 USDC".to_string(),
            skills: "solidity,erc20,hardhat".to_string(),
            desc: "Write and deploy an ERC-20 token sale contract with a hard cap, \
                   a vesting schedule, and an emergency pause switch."
                .to_string(),
            created: now - 2 * DAY_MS,
            owner: Some("0x8f4aC12e90b7D3f1a6Ee402B77d90c21e4a9b30D".to_string()),
        },
        Project {
            id: "seed-nft-frontend".to_string(),
            title: "NFT marketplace frontend".to_string(),
            budget: "1,500 - 2,500 USDC".to_string(),
            skills: "react,ethers,ipfs".to_string(),
            desc: "Build the browsing and bidding UI for an existing NFT marketplace \
                   contract, including wallet connect and live auction updates."
                .to_string(),
            created: now - 5 * DAY_MS,
            owner: None,
        },
        Project {
            id: "seed-security-audit".to_string(),
            title: "Security audit".to_string(),
            budget: "8,000+ USDC".to_string(),
            skills: "solidity,foundry,auditing".to_string(),
            desc: "Full audit of a lending protocol (4 contracts, ~2k LoC) with a \
                   written report and severity-ranked findings."
                .to_string(),
            created: now - 9 * DAY_MS,
            owner: Some("0x1bd0E77aF29c4D88b1f3aA05c6410F92Bc3d77aF".to_string()),
        },
    ]
}
