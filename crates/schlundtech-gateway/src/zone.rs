// # Zone Info
//
// Typed view over the `zone` block returned by a zone info task. Only the
// parts the record update needs are extracted: the name server, the SOA
// block (echoed back verbatim on add) and the existing resource records.

use schlundtech_core::{Error, Result, XmlMap, XmlValue};

use crate::OP_ZONE_INFO;

/// A resource record listed in a zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// Short name relative to the zone ("" for the apex)
    pub name: String,
    /// Record type (e.g. "TXT")
    pub record_type: Option<String>,
    /// Record value
    pub value: Option<String>,
    /// TTL as sent by the gateway
    pub ttl: Option<String>,
}

impl ResourceRecord {
    fn from_map(map: &XmlMap) -> Self {
        let text = |key: &str| map.get_text(key).map(str::to_string);
        Self {
            name: map.get_text("name").unwrap_or_default().to_string(),
            record_type: text("type"),
            value: text("value"),
            ttl: text("ttl"),
        }
    }
}

/// Zone details needed to build an update task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneInfo {
    /// Zone name
    pub name: String,
    /// Primary name server
    pub system_ns: Option<String>,
    /// SOA block, echoed back unchanged on record add
    pub soa: Option<XmlValue>,
    /// Resource records currently in the zone
    pub records: Vec<ResourceRecord>,
}

impl ZoneInfo {
    /// Extract zone details from a `zone` block
    pub fn from_map(zone: &XmlMap) -> Result<Self> {
        let name = zone
            .get_text("name")
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::gateway(OP_ZONE_INFO, "zone data carries no name"))?;

        // Zero, one or many <rr> elements
        let records = zone
            .get("rr")
            .map(|rr| {
                rr.items()
                    .iter()
                    .filter_map(XmlValue::as_map)
                    .map(ResourceRecord::from_map)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            name: name.to_string(),
            system_ns: zone.get_text("system_ns").map(str::to_string),
            soa: zone.get("soa").cloned(),
            records,
        })
    }

    /// Check for a record with the given short name, of any type or value
    pub fn has_record(&self, short_name: &str) -> bool {
        self.records.iter().any(|record| record.name == short_name)
    }

    /// The `zone` block of an update task: name and system name server
    pub fn update_target(&self, operation: &str) -> Result<XmlMap> {
        let system_ns = self.system_ns.as_deref().ok_or_else(|| {
            Error::gateway(
                operation,
                format!("zone info for {} carries no system_ns", self.name),
            )
        })?;

        Ok(XmlMap::new()
            .with("name", self.name.as_str())
            .with("system_ns", system_ns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> XmlValue {
        XmlValue::Map(
            XmlMap::new()
                .with("name", name)
                .with("type", "TXT")
                .with("value", "v")
                .with("ttl", 60u32),
        )
    }

    #[test]
    fn test_zone_without_records() {
        let zone = ZoneInfo::from_map(&XmlMap::new().with("name", "example.com")).unwrap();
        assert_eq!(zone.name, "example.com");
        assert!(zone.records.is_empty());
        assert!(zone.soa.is_none());
        assert!(!zone.has_record(""));
    }

    #[test]
    fn test_single_and_repeated_records() {
        let single = XmlMap::new().with("name", "example.com").with("rr", record("www"));
        let zone = ZoneInfo::from_map(&single).unwrap();
        assert_eq!(zone.records.len(), 1);
        assert!(zone.has_record("www"));
        assert_eq!(zone.records[0].ttl.as_deref(), Some("60"));

        let many = XmlMap::new()
            .with("name", "example.com")
            .with("rr", XmlValue::List(vec![record("www"), record("_acme-challenge")]));
        let zone = ZoneInfo::from_map(&many).unwrap();
        assert_eq!(zone.records.len(), 2);
        assert!(zone.has_record("_acme-challenge"));
        assert!(!zone.has_record("mail"));
    }

    #[test]
    fn test_name_required() {
        assert!(ZoneInfo::from_map(&XmlMap::new()).is_err());
        assert!(ZoneInfo::from_map(&XmlMap::new().with("name", "")).is_err());
    }

    #[test]
    fn test_update_target_requires_system_ns() {
        let zone = ZoneInfo::from_map(&XmlMap::new().with("name", "example.com")).unwrap();
        assert!(matches!(
            zone.update_target("record add"),
            Err(Error::Gateway { .. })
        ));

        let zone = ZoneInfo::from_map(
            &XmlMap::new()
                .with("name", "example.com")
                .with("system_ns", "ns1.example.com"),
        )
        .unwrap();
        let target = zone.update_target("record add").unwrap();
        assert_eq!(target.get_text("name"), Some("example.com"));
        assert_eq!(target.get_text("system_ns"), Some("ns1.example.com"));
    }
}
