//! End-to-end extraction over a pre-seeded block cache. No network involved:
//! every height resolves from `<out>/<height>.block`.

use babylon_msg_extract::consts::{MSG_ADD_FINALITY_SIG, SUMMARY_SEPARATOR};
use babylon_msg_extract::envelope::{Any, AuthInfo, TxBody, TxRaw};
use babylon_msg_extract::messages::MsgAddFinalitySig;
use babylon_msg_extract::runner;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use config::{ExtractConfig, ExtractorConfig, LogConfig, NodeConfig};
use prost::Message;
use std::path::Path;

fn test_config(out_dir: &Path) -> ExtractorConfig {
    ExtractorConfig {
        node: NodeConfig {
            // never dialed: all heights are cached
            url: "http://127.0.0.1:1/block".to_string(),
            timeout_secs: 1,
        },
        extract: ExtractConfig {
            out_dir: out_dir.to_string_lossy().into_owned(),
            max_concurrent: 4,
        },
        log: LogConfig::default(),
    }
}

fn finality_sig(signer: &str) -> Any {
    Any {
        type_url: MSG_ADD_FINALITY_SIG.to_string(),
        value: MsgAddFinalitySig {
            signer: signer.to_string(),
            block_height: 100,
            ..Default::default()
        }
        .encode_to_vec(),
    }
}

fn encode_tx(messages: Vec<Any>) -> String {
    let raw = TxRaw {
        body_bytes: TxBody {
            messages,
            ..Default::default()
        }
        .encode_to_vec(),
        auth_info_bytes: AuthInfo::default().encode_to_vec(),
        signatures: vec![],
    };
    STANDARD.encode(raw.encode_to_vec())
}

fn seed_block(out_dir: &Path, height: u64, txs: Vec<String>) {
    let doc = serde_json::json!({
        "jsonrpc": "2.0",
        "id": -1,
        "result": {
            "block_id": { "hash": "ABCD", "parts": { "total": 1, "hash": "EF01" } },
            "block": {
                "header": { "chain_id": "bbn-test-5", "height": height.to_string() },
                "data": { "txs": txs },
                "evidence": { "evidence": [] },
                "last_commit": { "height": (height - 1).to_string(), "round": 0, "signatures": [] }
            }
        }
    });
    std::fs::write(
        out_dir.join(format!("{height}.block")),
        doc.to_string(),
    )
    .unwrap();
}

/// Heights [100, 101], block 100 carrying two finality signatures and one
/// unrecognized message, block 101 empty. Requested out of order to exercise
/// the re-sort by parsed height.
fn seed_scenario(out_dir: &Path) {
    seed_block(
        out_dir,
        100,
        vec![
            encode_tx(vec![
                finality_sig("bbn1hjh7kga95k9h5ml8ezgkqtgz2njz3gvnwsj8js"),
                Any {
                    type_url: "/cosmos.bank.v1beta1.MsgSend".to_string(),
                    value: vec![],
                },
            ]),
            encode_tx(vec![finality_sig("bbn1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq")]),
        ],
    );
    seed_block(out_dir, 101, vec![]);
}

#[tokio::test]
async fn extracts_counts_payloads_and_aggregation() {
    let dir = tempfile::tempdir().unwrap();
    seed_scenario(dir.path());

    let aggregation = runner::run(&test_config(dir.path()), &[101, 100])
        .await
        .unwrap();

    let counts_100 = std::fs::read_to_string(dir.path().join("100.count")).unwrap();
    assert!(counts_100.starts_with("100 counts\n"));
    assert!(counts_100.contains("total: 3\n"));
    assert!(counts_100.contains(&format!("{MSG_ADD_FINALITY_SIG}: 2\n")));
    assert!(counts_100.contains("/cosmos.bank.v1beta1.MsgSend: 1\n"));
    assert!(counts_100.ends_with(&format!("{SUMMARY_SEPARATOR}\n")));

    let payloads: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("100.MsgAddFinalitySig.txs.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(payloads.as_array().unwrap().len(), 2);
    assert_eq!(
        payloads[0]["signer"],
        "bbn1hjh7kga95k9h5ml8ezgkqtgz2njz3gvnwsj8js"
    );

    // the unrecognized type gets counted but never dumped
    assert!(!dir.path().join("100.MsgSend.txs.json").exists());

    let counts_101 = std::fs::read_to_string(dir.path().join("101.count")).unwrap();
    let lines: Vec<_> = counts_101.lines().collect();
    assert_eq!(lines, ["101 counts", "total: 0", SUMMARY_SEPARATOR]);

    // aggregation echoes the file content, sorted by height despite the
    // reversed request order
    let aggregation_file =
        std::fs::read_to_string(dir.path().join("aggregation.txt")).unwrap();
    assert_eq!(aggregation, aggregation_file);
    assert!(aggregation.find("100 counts").unwrap() < aggregation.find("101 counts").unwrap());
}

#[tokio::test]
async fn rerun_over_cache_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    seed_scenario(dir.path());
    let config = test_config(dir.path());

    let first = runner::run(&config, &[100, 101]).await.unwrap();
    let counts_first = std::fs::read(dir.path().join("100.count")).unwrap();
    let txs_first = std::fs::read(dir.path().join("100.MsgAddFinalitySig.txs.json")).unwrap();

    let second = runner::run(&config, &[100, 101]).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(
        counts_first,
        std::fs::read(dir.path().join("100.count")).unwrap()
    );
    assert_eq!(
        txs_first,
        std::fs::read(dir.path().join("100.MsgAddFinalitySig.txs.json")).unwrap()
    );
}

#[tokio::test]
async fn uncached_height_fails_the_whole_run() {
    let dir = tempfile::tempdir().unwrap();
    seed_scenario(dir.path());

    // 102 is not cached and the node URL refuses connections
    let result = runner::run(&test_config(dir.path()), &[100, 102]).await;
    assert!(result.is_err());

    // fail-fast: no output artifacts from the failed run
    assert!(!dir.path().join("100.count").exists());
    assert!(!dir.path().join("aggregation.txt").exists());
}

#[tokio::test]
async fn tampered_envelope_fails_with_unknown_field() {
    use babylon_msg_extract::error::ExtractError;

    let dir = tempfile::tempdir().unwrap();

    let mut tx_bytes = TxRaw {
        body_bytes: TxBody::default().encode_to_vec(),
        auth_info_bytes: AuthInfo::default().encode_to_vec(),
        signatures: vec![],
    }
    .encode_to_vec();
    // smuggle in field 7, varint wire type
    tx_bytes.extend_from_slice(&[0x38, 0x01]);

    seed_block(dir.path(), 200, vec![STANDARD.encode(tx_bytes)]);

    let result = runner::run(&test_config(dir.path()), &[200]).await;
    assert!(matches!(
        result,
        Err(ExtractError::UnknownField {
            container: "TxRaw",
            field: 7
        })
    ));
}
