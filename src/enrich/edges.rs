// SENTINEL Atlas - Enrichment
// edges.rs - Connection security flag derivation
//
// Copyright (c) 2026 CIPS Corps. All rights reserved.

use crate::document::EdgeSecurityFlags;

/// Node id of the public client entry point (frontend).
const PUBLIC_CLIENT: &str = "1";
/// Node id of the CDN; `1 -> 2` is the only internet-zone hop.
const CDN: &str = "2";
/// Node id of the secrets store (Vault).
const SECRETS_STORE: &str = "6";
/// Node id of the primary database (PostgreSQL).
const PRIMARY_DATABASE: &str = "7";
/// Node id of the cache cluster (Redis).
const CACHE_CLUSTER: &str = "8";

/// The starting record every edge gets before overrides.
///
/// Every connection in the reference architecture is encrypted; TLS 1.3
/// with JWT auth inside the internal zone is the baseline.
fn baseline() -> EdgeSecurityFlags {
    EdgeSecurityFlags {
        encrypted: true,
        encryption_protocol: "TLS-1.3".into(),
        authenticated: true,
        authentication_type: "jwt".into(),
        authorization_enabled: true,
        rate_limited: true,
        rate_limit_value: "100/min".into(),
        bidirectional: false,
        data_flow_direction: "outbound".into(),
        logging_enabled: true,
        network_zone: "internal".into(),
    }
}

/// Derive the security flag record for one edge.
///
/// Starts from [`baseline`] and applies override rules in a fixed order.
/// Later rules overwrite earlier ones on the fields they touch; there is
/// no merging. A database endpoint therefore wins over whatever the
/// protocol label said.
///
/// # Arguments
/// * `edge_id` - Edge identifier (may itself carry an mTLS marker).
/// * `protocol` - The edge's protocol label, empty if unlabeled.
/// * `source` - Source node id.
/// * `target` - Target node id.
pub fn derive_edge_flags(
    edge_id: &str,
    protocol: &str,
    source: &str,
    target: &str,
) -> EdgeSecurityFlags {
    let mut flags = baseline();

    // Rule 1/2: protocol label. The HTTPS arm restates the baseline; it is
    // kept so the label always decides the protocol field explicitly.
    if protocol.contains("mTLS") || edge_id.contains("mTLS") {
        flags.encryption_protocol = "mTLS".into();
        flags.authentication_type = "mtls".into();
        flags.rate_limit_value = "1000/min".into();
    } else if protocol.contains("HTTPS") {
        flags.encryption_protocol = "TLS-1.3".into();
    }

    // Rule 3: client to CDN crosses the public internet, unauthenticated.
    if source == PUBLIC_CLIENT && target == CDN {
        flags.network_zone = "internet".into();
        flags.authentication_type = "none".into();
        flags.authorization_enabled = false;
    }

    // Rule 4: anything touching the primary database is forced to mTLS in
    // the data zone, regardless of what the label claimed.
    if source == PRIMARY_DATABASE || target == PRIMARY_DATABASE {
        flags.encryption_protocol = "mTLS".into();
        flags.authentication_type = "mtls".into();
        flags.network_zone = "data".into();
        flags.rate_limit_value = "500/min".into();
    }

    // Rule 5: cache connections stay TLS but live in the data zone.
    if source == CACHE_CLUSTER || target == CACHE_CLUSTER {
        flags.encryption_protocol = "TLS-1.3".into();
        flags.network_zone = "data".into();
    }

    // Rule 6: secrets store connections are TLS + JWT in the data zone.
    if source == SECRETS_STORE || target == SECRETS_STORE {
        flags.encryption_protocol = "TLS-1.3".into();
        flags.authentication_type = "jwt".into();
        flags.network_zone = "data".into();
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_internal_edge_gets_baseline() {
        let flags = derive_edge_flags("e4-5", "HTTPS", "4", "5");
        assert!(flags.encrypted);
        assert_eq!(flags.encryption_protocol, "TLS-1.3");
        assert_eq!(flags.authentication_type, "jwt");
        assert!(flags.authorization_enabled);
        assert_eq!(flags.rate_limit_value, "100/min");
        assert_eq!(flags.network_zone, "internal");
    }

    #[test]
    fn test_mtls_label_raises_rate_limit() {
        let flags = derive_edge_flags("e9-5", "mTLS gRPC", "9", "5");
        assert_eq!(flags.encryption_protocol, "mTLS");
        assert_eq!(flags.authentication_type, "mtls");
        assert_eq!(flags.rate_limit_value, "1000/min");
    }

    #[test]
    fn test_mtls_marker_in_edge_id_counts() {
        let flags = derive_edge_flags("e-mTLS-internal", "", "4", "5");
        assert_eq!(flags.encryption_protocol, "mTLS");
    }

    #[test]
    fn test_public_entry_is_unauthenticated_internet() {
        let flags = derive_edge_flags("e1-2", "HTTPS", "1", "2");
        assert_eq!(flags.network_zone, "internet");
        assert_eq!(flags.authentication_type, "none");
        assert!(!flags.authorization_enabled);
        // still encrypted: the whole architecture is TLS end to end
        assert!(flags.encrypted);
    }

    #[test]
    fn test_database_endpoint_overrides_protocol_label() {
        // Labeled HTTPS, but the database rule rewrites protocol and zone
        let flags = derive_edge_flags("e5-7", "HTTPS", "5", "7");
        assert_eq!(flags.encryption_protocol, "mTLS");
        assert_eq!(flags.authentication_type, "mtls");
        assert_eq!(flags.network_zone, "data");
        assert_eq!(flags.rate_limit_value, "500/min");
    }

    #[test]
    fn test_database_as_source_also_matches() {
        let flags = derive_edge_flags("e7-10", "HTTPS", "7", "10");
        assert_eq!(flags.encryption_protocol, "mTLS");
        assert_eq!(flags.network_zone, "data");
    }

    #[test]
    fn test_cache_edge_lands_in_data_zone() {
        let flags = derive_edge_flags("e5-8", "TLS", "5", "8");
        assert_eq!(flags.encryption_protocol, "TLS-1.3");
        assert_eq!(flags.network_zone, "data");
        // auth untouched by the cache rule
        assert_eq!(flags.authentication_type, "jwt");
    }

    #[test]
    fn test_secrets_store_edge_forces_jwt() {
        // mTLS label first sets mtls auth; the Vault rule then wins
        let flags = derive_edge_flags("e5-6", "mTLS", "5", "6");
        assert_eq!(flags.encryption_protocol, "TLS-1.3");
        assert_eq!(flags.authentication_type, "jwt");
        assert_eq!(flags.network_zone, "data");
        // rate limit from the mTLS rule survives: later rules only touch
        // the fields they name
        assert_eq!(flags.rate_limit_value, "1000/min");
    }
}
