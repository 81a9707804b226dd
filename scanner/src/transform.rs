use fblock_node::FblockResponse;
use fblock_postgres::FblockModel;

use crate::error::ScanError;

/// Turn a fetched wire record into the row to persist.
///
/// The node's reported height must match the height we asked for; silently
/// accepting a mismatch would corrupt the gap-free height sequence. A block
/// without transactions gets a NULL timestamp.
pub(crate) fn into_model(requested: u32, response: FblockResponse) -> Result<FblockModel, ScanError> {
    let reported = response.fblock.height;
    if reported != requested {
        return Err(ScanError::HeightMismatch {
            requested,
            reported,
        });
    }
    let key_mr = hex::decode(&response.fblock.key_mr).map_err(|source| ScanError::Codec {
        height: requested,
        field: "keymr",
        source,
    })?;
    let data = hex::decode(&response.rawdata).map_err(|source| ScanError::Codec {
        height: requested,
        field: "rawdata",
        source,
    })?;
    Ok(FblockModel {
        height: i64::from(requested),
        timestamp: response
            .fblock
            .transactions
            .first()
            .map(|tx| tx.millitimestamp),
        tx_count: response.fblock.transactions.len() as i32,
        ec_exchange_rate: response.fblock.ec_exchange_rate,
        price: None,
        key_mr,
        data,
    })
}

#[cfg(test)]
mod tests {
    use fblock_node::{FactoidTransaction, Fblock};

    use super::*;

    fn response(height: u32) -> FblockResponse {
        FblockResponse {
            fblock: Fblock {
                height,
                key_mr: "ab12".to_string(),
                ec_exchange_rate: 1_000_000,
                transactions: vec![FactoidTransaction {
                    millitimestamp: 1000,
                    txid: None,
                }],
            },
            rawdata: "deadbeef".to_string(),
        }
    }

    #[test]
    fn builds_the_row_from_the_wire_record() {
        let model = into_model(7, response(7)).unwrap();
        assert_eq!(
            model,
            FblockModel {
                height: 7,
                timestamp: Some(1000),
                tx_count: 1,
                ec_exchange_rate: 1_000_000,
                price: None,
                key_mr: vec![0xab, 0x12],
                data: vec![0xde, 0xad, 0xbe, 0xef],
            }
        );
    }

    #[test]
    fn rejects_a_height_mismatch() {
        let err = into_model(7, response(8)).unwrap_err();
        assert!(matches!(
            err,
            ScanError::HeightMismatch {
                requested: 7,
                reported: 8
            }
        ));
    }

    #[test]
    fn rejects_malformed_key_mr_hex() {
        let mut bad = response(7);
        bad.fblock.key_mr = "zz".to_string();
        let err = into_model(7, bad).unwrap_err();
        assert!(matches!(err, ScanError::Codec { field: "keymr", .. }));
    }

    #[test]
    fn rejects_malformed_rawdata_hex() {
        let mut bad = response(7);
        bad.rawdata = "abc".to_string();
        let err = into_model(7, bad).unwrap_err();
        assert!(matches!(err, ScanError::Codec { field: "rawdata", .. }));
    }

    #[test]
    fn empty_block_has_no_timestamp() {
        let mut empty = response(7);
        empty.fblock.transactions.clear();
        let model = into_model(7, empty).unwrap();
        assert_eq!(model.timestamp, None);
        assert_eq!(model.tx_count, 0);
    }
}
