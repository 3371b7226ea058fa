//! Ledger integration tests
//!
//! Exercises the public surface end to end: submission, mining, validation,
//! snapshots and the JSON request handler.

use pow_ledger::{
    derive_hash, validate_chain, ApiHandler, Block, Blockchain, ChainSnapshot, Config,
    Difficulty, LedgerError, ProofOfWork, Transaction,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

fn easy_ledger() -> Blockchain {
    Blockchain::new(&Config::with_difficulty(1)).unwrap()
}

fn transfer(n: usize) -> Transaction {
    Transaction::new(format!("user{n}"), format!("user{}", n + 1), (n + 1) as f64)
}

#[test]
fn test_single_transfer_scenario() {
    let ledger = easy_ledger();

    ledger.submit_transaction("A", "B", 10.0).unwrap();
    assert_eq!(ledger.pending(), vec![Transaction::new("A", "B", 10.0)]);

    ledger.mine_block().unwrap();
    let chain = ledger.chain();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[1].transactions(), &[Transaction::new("A", "B", 10.0)]);
    assert!(ledger.pending().is_empty());
    assert!(ledger.is_valid());
}

#[test]
fn test_mining_empty_pool_is_rejected() {
    let ledger = easy_ledger();
    assert_eq!(ledger.mine_block(), Err(LedgerError::NoPendingTransactions));
    assert_eq!(ledger.chain().len(), 1);
}

#[test]
fn test_blank_sender_is_rejected() {
    let ledger = easy_ledger();
    let result = ledger.submit_transaction("", "B", 5.0);
    assert!(matches!(result, Err(LedgerError::InvalidTransaction(_))));
    assert!(ledger.pending().is_empty());
}

#[test]
fn test_chain_properties_after_many_blocks() {
    let ledger = Blockchain::new(&Config::with_difficulty(2)).unwrap();
    let difficulty = Difficulty::leading_hex_zeros(2);

    let mut n = 0;
    for per_block in [1, 3, 2] {
        for _ in 0..per_block {
            ledger.submit(transfer(n)).unwrap();
            n += 1;
        }
        ledger.mine_block().unwrap();
    }

    let chain = ledger.chain();
    assert_eq!(chain.len(), 4);
    for i in 1..chain.len() {
        assert_eq!(chain[i].previous_hash(), chain[i - 1].hash());
        assert!(chain[i].hash().starts_with("00"));
        assert!(ProofOfWork::validate(&chain[i], &difficulty));
        assert_eq!(
            chain[i].hash(),
            derive_hash(
                chain[i].index(),
                chain[i].timestamp(),
                chain[i].transactions(),
                chain[i].previous_hash(),
                chain[i].nonce(),
            )
        );
    }

    // every submitted transfer landed in exactly one block, in order
    let sealed: Vec<Transaction> = chain
        .iter()
        .flat_map(|b| b.transactions().to_vec())
        .collect();
    assert_eq!(sealed, (0..n).map(transfer).collect::<Vec<_>>());
    assert!(ledger.is_valid());
}

#[test]
fn test_pool_and_chain_stay_exclusive() {
    let ledger = easy_ledger();
    ledger.submit(transfer(0)).unwrap();
    ledger.submit(transfer(1)).unwrap();
    let drained = ledger.pending();
    let block = ledger.mine_block().unwrap();
    assert_eq!(block.transactions(), drained.as_slice());
    ledger.submit(transfer(2)).unwrap();

    let sealed: Vec<Transaction> = ledger
        .chain()
        .iter()
        .flat_map(|b| b.transactions().to_vec())
        .collect();
    assert_eq!(sealed, drained);
    let pending = ledger.pending();
    assert_eq!(pending, vec![transfer(2)]);
    for tx in &pending {
        assert!(!sealed.contains(tx));
    }
}

#[test]
fn test_tampering_with_exported_chain_is_detected() {
    let ledger = easy_ledger();
    ledger.submit_transaction("A", "B", 10.0).unwrap();
    ledger.mine_block().unwrap();

    let mut exported: Value = serde_json::to_value(ledger.chain()).unwrap();
    exported[1]["transactions"][0]["amount"] = json!(10.5);
    let tampered: Vec<Block> = serde_json::from_value(exported).unwrap();

    let report = validate_chain(&tampered);
    assert!(!report.is_valid());
    assert_eq!(report.invalid_positions(), vec![1]);
    // the ledger's own copy is untouched
    assert!(ledger.is_valid());
}

#[test]
fn test_snapshot_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger.snapshot");

    let ledger = easy_ledger();
    ledger.submit(transfer(0)).unwrap();
    ledger.mine_block().unwrap();
    ledger.submit(transfer(1)).unwrap();
    std::fs::write(&path, ledger.snapshot().to_bytes().unwrap()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let restored =
        Blockchain::restore(ChainSnapshot::from_bytes(&bytes).unwrap(), &Config::with_difficulty(1))
            .unwrap();
    assert_eq!(restored.chain(), ledger.chain());
    assert_eq!(restored.pending(), vec![transfer(1)]);
}

#[test]
fn test_tampered_snapshot_is_refused() {
    let ledger = easy_ledger();
    ledger.submit_transaction("A", "B", 10.0).unwrap();
    ledger.mine_block().unwrap();

    let mut snapshot = ledger.snapshot();
    let mut value = serde_json::to_value(&snapshot.chain[1]).unwrap();
    value["nonce"] = json!(value["nonce"].as_u64().unwrap() + 1);
    snapshot.chain[1] = serde_json::from_value(value).unwrap();

    assert!(matches!(
        Blockchain::restore(snapshot, &Config::with_difficulty(1)),
        Err(LedgerError::CorruptSnapshot(_))
    ));
}

#[test]
fn test_concurrent_submissions_are_never_lost() {
    let ledger = Arc::new(easy_ledger());
    let writers: Vec<_> = (0..4)
        .map(|w| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                for i in 0..25 {
                    ledger.submit(transfer(w * 100 + i)).unwrap();
                }
            })
        })
        .collect();

    let miner = {
        let ledger = Arc::clone(&ledger);
        thread::spawn(move || {
            let mut mined = 0;
            for _ in 0..20 {
                match ledger.mine_block() {
                    Ok(_) => mined += 1,
                    Err(LedgerError::NoPendingTransactions) => thread::yield_now(),
                    Err(e) => panic!("unexpected mining error: {e}"),
                }
            }
            mined
        })
    };

    for writer in writers {
        writer.join().unwrap();
    }
    miner.join().unwrap();
    while ledger.can_mine() {
        ledger.mine_block().unwrap();
    }

    let sealed: usize = ledger
        .chain()
        .iter()
        .map(|b| b.transactions().len())
        .sum();
    assert_eq!(sealed, 100);
    assert!(ledger.pending().is_empty());
    assert!(ledger.is_valid());
}

#[test]
fn test_json_handler_end_to_end() {
    let handler = ApiHandler::new(Arc::new(easy_ledger()));
    let call = |request: Value| -> Value {
        serde_json::from_str(&handler.handle_json(&request.to_string())).unwrap()
    };

    assert_eq!(call(json!({"op": "list_pending"})), json!([]));
    assert_eq!(
        call(json!({"op": "mine_block"}))["error"]["kind"],
        "no_pending_transactions"
    );
    assert_eq!(
        call(json!({"op": "submit_transaction", "sender": "A", "recipient": "B", "amount": 10})),
        json!({"pending": 1})
    );
    let block = call(json!({"op": "mine_block"}));
    for key in ["index", "timestamp", "hash", "previous_hash", "nonce", "transactions"] {
        assert!(block.get(key).is_some(), "mined block is missing {key}");
    }
    assert_eq!(call(json!({"op": "check_validity"})), json!({"valid": true}));
    assert_eq!(call(json!({"op": "list_chain"})).as_array().unwrap().len(), 2);
}
