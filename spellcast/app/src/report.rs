// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use ethers_core::abi::{Event, RawLog, Token};
use ethers_core::types::{Address, Bytes, H256};
use serde::Serialize;
use spellcast_vm_host::library::Library;
use spellcast_vm_host::{LogEntry, MemoryHost};
use spellcast_vm_interpreter::{ElementsTape, Outcome};

/// What a successful cast is reported as.
#[derive(Debug, Clone, Serialize)]
pub struct CastReport {
    pub steps: usize,
    pub tape: ElementsTape,
    pub gas_used: u64,
    pub events: Vec<EventReport>,
}

impl CastReport {
    /// Combine the outcome with the logs emitted after the first `logs_before` ones.
    pub fn new(outcome: Outcome, host: &MemoryHost, logs_before: usize) -> Self {
        let events = host
            .state()
            .logs()
            .skip(logs_before)
            .map(EventReport::from)
            .collect();

        Self {
            steps: outcome.steps,
            tape: outcome.tape,
            gas_used: host.gas().used(),
            events,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParamReport {
    pub name: String,
    pub value: String,
}

/// An emitted log, decoded if it matches an event of the library.
#[derive(Debug, Clone, Serialize)]
pub struct EventReport {
    pub address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamReport>,
    pub topics: Vec<H256>,
    pub data: Bytes,
}

impl From<&LogEntry> for EventReport {
    fn from(log: &LogEntry) -> Self {
        let mut report = Self {
            address: log.address,
            event: None,
            params: Vec::new(),
            topics: log.topics.clone(),
            data: log.data.clone(),
        };

        let Some(event) = log.topics.first().and_then(find_event) else {
            return report;
        };

        let raw = RawLog {
            topics: log.topics.clone(),
            data: log.data.to_vec(),
        };

        match event.parse_log(raw) {
            Ok(parsed) => {
                report.event = Some(event.name.clone());
                report.params = parsed
                    .params
                    .into_iter()
                    .map(|p| ParamReport {
                        name: p.name,
                        value: format_token(&p.value),
                    })
                    .collect();
            }
            Err(e) => {
                tracing::warn!(event = %event.name, error = %e, "failed to decode log");
            }
        }
        report
    }
}

fn find_event(topic: &H256) -> Option<Event> {
    Library::endpoints()
        .into_iter()
        .flat_map(|(_, endpoint)| endpoint.abi().events().cloned().collect::<Vec<_>>())
        .find(|e| e.signature() == *topic)
}

fn format_token(token: &Token) -> String {
    match token {
        Token::Address(a) => format!("{a:?}"),
        Token::Uint(n) => n.to_string(),
        Token::Bool(b) => b.to_string(),
        Token::String(s) => s.clone(),
        Token::Bytes(b) | Token::FixedBytes(b) => format!("0x{}", hex::encode(b)),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use ethers_core::abi::Token;
    use ethers_core::types::{Address, Bytes, H256, U256};
    use spellcast_vm_host::library::{event, EVENTS_ABI, EVENTS_ADDR};
    use spellcast_vm_host::LogEntry;

    use super::{format_token, EventReport};

    #[test]
    fn decode_library_event() {
        let ev = event(&EVENTS_ABI, "EmittedUint").unwrap();
        let log = LogEntry {
            address: EVENTS_ADDR,
            topics: vec![ev.signature()],
            data: Bytes::from(ethers_core::abi::encode(&[Token::Uint(U256::from(7))])),
        };

        let report = EventReport::from(&log);

        assert_eq!(report.event.as_deref(), Some("EmittedUint"));
        assert_eq!(report.params.len(), 1);
        assert_eq!(report.params[0].value, "7");
    }

    #[test]
    fn unknown_events_stay_raw() {
        let log = LogEntry {
            address: Address::repeat_byte(1),
            topics: vec![H256::repeat_byte(2)],
            data: Bytes::from(vec![1, 2, 3]),
        };

        let report = EventReport::from(&log);

        assert!(report.event.is_none());
        assert!(report.params.is_empty());
        assert_eq!(report.data, log.data);
    }

    #[test]
    fn format_tokens() {
        assert_eq!(format_token(&Token::Uint(U256::from(1000))), "1000");
        assert_eq!(format_token(&Token::Bytes(vec![0xab])), "0xab");
        assert_eq!(
            format_token(&Token::Address(Address::repeat_byte(0xca))),
            format!("0x{}", "ca".repeat(20))
        );
    }
}
