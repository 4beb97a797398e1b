//! Byte-level address patching of account fixtures.
//!
//! The stock patch targets an SPL Token mint: bytes `[0, 4)` hold the
//! `COption` tag of the mint authority and bytes `[4, 36)` hold the
//! authority pubkey itself. Overwriting that pubkey hands mint authority
//! to a locally controlled key so tests can mint against a cloned mint.

use std::path::PathBuf;

use serde::Serialize;

use crate::address::{Address, ADDRESS_LEN};
use crate::config::PatchConfig;
use crate::error::PatchError;
use crate::fixture::AccountFixture;

/// Offset of the mint-authority pubkey inside an SPL Token mint.
pub const DEFAULT_OFFSET: usize = 4;

const COPTION_TAG_LEN: usize = 4;

/// Overwrite `buffer[offset..offset + 32]` with `address`.
///
/// Returns the address previously stored at that offset. Fails without
/// touching the buffer when it is too short.
pub fn patch_bytes(
    buffer: &mut [u8],
    offset: usize,
    address: &Address,
) -> Result<Address, PatchError> {
    let len = buffer.len();
    let end = offset
        .checked_add(ADDRESS_LEN)
        .filter(|end| *end <= len)
        .ok_or(PatchError::OutOfRange { offset, len })?;

    let target = &mut buffer[offset..end];
    let previous = Address::from_slice(target)?;
    target.copy_from_slice(address.as_bytes());
    Ok(previous)
}

/// Whether the `COption` tag preceding a default-offset patch is all zeros.
fn authority_tag_none(data: &[u8], offset: usize) -> bool {
    offset == DEFAULT_OFFSET
        && data
            .get(..COPTION_TAG_LEN)
            .map_or(false, |tag| tag.iter().all(|b| *b == 0))
}

/// Outcome of applying an [`AccountPatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchReport {
    pub offset: usize,
    pub data_len: usize,
    pub previous: Address,
    pub address: Address,
    pub changed: bool,
    /// The `COption` tag before the default offset reads `None`.
    pub authority_tag_none: bool,
}

/// Address patch at a fixed offset of the account data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountPatch {
    pub offset: usize,
    pub address: Address,
}

impl AccountPatch {
    pub fn new(address: Address) -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            address,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Build the patch described by `config`, decoding its base58 address.
    pub fn from_config(config: &PatchConfig) -> Result<Self, PatchError> {
        let address = config.address.parse()?;
        Ok(Self::new(address).with_offset(config.offset))
    }

    /// Decode the fixture payload, patch it, and store it back.
    ///
    /// The fixture is left untouched when any step fails.
    pub fn apply_to(&self, fixture: &mut AccountFixture) -> Result<PatchReport, PatchError> {
        let mut data = fixture.account_data()?;
        let previous = patch_bytes(&mut data, self.offset, &self.address)?;

        fixture.set_account_data(&data)?;

        let report = PatchReport {
            offset: self.offset,
            data_len: data.len(),
            previous,
            address: self.address,
            changed: previous != self.address,
            authority_tag_none: authority_tag_none(&data, self.offset),
        };
        if report.authority_tag_none {
            log::warn!(
                "[Patch] Authority tag before offset {} is None; the patched address may be ignored",
                report.offset
            );
        }
        log::info!(
            "[Patch] Replaced {} with {} at offset {} ({} bytes of account data)",
            report.previous,
            report.address,
            report.offset,
            report.data_len
        );
        Ok(report)
    }
}

/// Load, patch, and (unless `dry_run` is set) write a fixture.
///
/// Returns the report together with the destination path.
pub fn run(config: &PatchConfig) -> Result<(PatchReport, PathBuf), PatchError> {
    let mut fixture = AccountFixture::load(&config.input)?;
    let patch = AccountPatch::from_config(config)?;
    let report = patch.apply_to(&mut fixture)?;

    let output = config.output_path().to_path_buf();
    if config.dry_run {
        log::info!("[Patch] Dry run, skipping write to {}", output.display());
    } else {
        fixture.save(&output)?;
    }
    Ok((report, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::DEFAULT_ADDRESS;
    use std::fs;

    fn default_address() -> Address {
        DEFAULT_ADDRESS.parse().unwrap()
    }

    fn mint_buffer() -> Vec<u8> {
        (0u8..82).collect()
    }

    fn fixture_with(data: &[u8]) -> AccountFixture {
        let json = serde_json::json!({
            "pubkey": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
            "account": {
                "lamports": 1461600,
                "data": [base64::encode(data), "base64"],
                "owner": "TokenkegQfeZyiNwAjbNbGKPFXCWuBvf9Ss623VQ5DA",
                "executable": false,
                "rentEpoch": 361,
                "space": data.len()
            }
        });
        AccountFixture::from_json(&json.to_string()).unwrap()
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("genesis-patcher-patch-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn only_address_range_changes() {
        let original = mint_buffer();
        let mut buffer = original.clone();
        let address = default_address();

        let previous = patch_bytes(&mut buffer, DEFAULT_OFFSET, &address).unwrap();

        assert_eq!(previous.as_bytes()[..], original[4..36]);
        assert_eq!(&buffer[..4], &original[..4]);
        assert_eq!(&buffer[4..36], &address.as_bytes()[..]);
        assert_eq!(&buffer[36..], &original[36..]);
    }

    #[test]
    fn buffer_of_exactly_36_bytes_succeeds() {
        let mut buffer = vec![1u8; 36];
        patch_bytes(&mut buffer, DEFAULT_OFFSET, &default_address()).unwrap();
        assert_eq!(&buffer[4..], &default_address().as_bytes()[..]);
    }

    #[test]
    fn buffer_of_35_bytes_is_out_of_range() {
        let mut buffer = vec![1u8; 35];
        let err = patch_bytes(&mut buffer, DEFAULT_OFFSET, &default_address()).unwrap_err();
        assert_eq!(err, PatchError::OutOfRange { offset: 4, len: 35 });
        assert_eq!(buffer, vec![1u8; 35]);
    }

    #[test]
    fn overflowing_offset_is_out_of_range() {
        let mut buffer = vec![0u8; 64];
        let err = patch_bytes(&mut buffer, usize::MAX - 8, &default_address()).unwrap_err();
        assert!(matches!(err, PatchError::OutOfRange { len: 64, .. }));
    }

    #[test]
    fn custom_offset_is_respected() {
        let original = mint_buffer();
        let mut buffer = original.clone();
        patch_bytes(&mut buffer, 50, &default_address()).unwrap();
        assert_eq!(&buffer[..50], &original[..50]);
        assert_eq!(&buffer[50..], &default_address().as_bytes()[..]);
    }

    #[test]
    fn apply_to_fixture_patches_payload() {
        let original = mint_buffer();
        let mut fixture = fixture_with(&original);

        let report = AccountPatch::new(default_address())
            .apply_to(&mut fixture)
            .unwrap();

        assert!(report.changed);
        assert_eq!(report.offset, 4);
        assert_eq!(report.data_len, 82);
        assert_eq!(report.previous, Address::from_slice(&original[4..36]).unwrap());

        let patched = fixture.account_data().unwrap();
        assert_eq!(&patched[..4], &original[..4]);
        assert_eq!(&patched[4..36], &default_address().as_bytes()[..]);
        assert_eq!(&patched[36..], &original[36..]);
        assert_eq!(fixture.document()["account"]["rentEpoch"], 361);
    }

    #[test]
    fn zero_authority_tag_is_reported() {
        let mut data = mint_buffer();
        data[..4].copy_from_slice(&[0, 0, 0, 0]);
        let mut fixture = fixture_with(&data);

        let report = AccountPatch::new(default_address())
            .apply_to(&mut fixture)
            .unwrap();

        assert!(report.authority_tag_none);
        let patched = fixture.account_data().unwrap();
        assert_eq!(&patched[..4], &[0, 0, 0, 0]);
    }

    #[test]
    fn some_authority_tag_is_not_reported() {
        let mut data = mint_buffer();
        data[..4].copy_from_slice(&1u32.to_le_bytes());
        let mut fixture = fixture_with(&data);

        let report = AccountPatch::new(default_address())
            .apply_to(&mut fixture)
            .unwrap();
        assert!(!report.authority_tag_none);
    }

    #[test]
    fn usdc_fixture_authority_tag_is_some() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/genesis/usdc.json");
        let mut fixture = AccountFixture::load(path).unwrap();

        let report = AccountPatch::new(default_address())
            .apply_to(&mut fixture)
            .unwrap();
        assert_eq!(report.data_len, 82);
        assert!(!report.authority_tag_none);
    }

    #[test]
    fn authority_tag_ignored_for_custom_offset() {
        let data = vec![0u8; 82];
        let mut fixture = fixture_with(&data);

        let report = AccountPatch::new(default_address())
            .with_offset(40)
            .apply_to(&mut fixture)
            .unwrap();
        assert!(!report.authority_tag_none);
    }

    #[test]
    fn report_serializes_addresses_as_base58() {
        let mut fixture = fixture_with(&[0u8; 36]);
        let report = AccountPatch::new(default_address())
            .apply_to(&mut fixture)
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["offset"], 4);
        assert_eq!(json["data_len"], 36);
        assert_eq!(json["previous"], "11111111111111111111111111111111");
        assert_eq!(json["address"], DEFAULT_ADDRESS);
        assert_eq!(json["changed"], true);
        assert_eq!(json["authority_tag_none"], true);
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let patch = AccountPatch::new(default_address());
        let mut once = fixture_with(&mint_buffer());
        patch.apply_to(&mut once).unwrap();

        let mut twice = once.clone();
        let report = patch.apply_to(&mut twice).unwrap();

        assert!(!report.changed);
        assert_eq!(once.to_json().unwrap(), twice.to_json().unwrap());
    }

    #[test]
    fn failed_patch_leaves_fixture_untouched() {
        let mut fixture = fixture_with(&[9u8; 35]);
        let before = fixture.clone();
        let err = AccountPatch::new(default_address())
            .apply_to(&mut fixture)
            .unwrap_err();
        assert_eq!(err, PatchError::OutOfRange { offset: 4, len: 35 });
        assert_eq!(fixture, before);
    }

    #[test]
    fn from_config_rejects_bad_address() {
        let config = PatchConfig {
            address: "11111111".to_string(),
            ..PatchConfig::default()
        };
        assert_eq!(
            AccountPatch::from_config(&config).unwrap_err(),
            PatchError::AddressLength { len: 8 }
        );
    }

    #[test]
    fn run_writes_patched_fixture_to_output() {
        let input = temp_path("run_input.json");
        let output = temp_path("nested/run_output.json");
        fs::create_dir_all(input.parent().unwrap()).unwrap();
        let original = fixture_with(&mint_buffer());
        original.save(&input).unwrap();

        let config = PatchConfig {
            input: input.clone(),
            output: Some(output.clone()),
            ..PatchConfig::default()
        };
        let (report, written) = run(&config).unwrap();

        assert_eq!(written, output);
        assert!(report.changed);
        assert_eq!(AccountFixture::load(&input).unwrap(), original);
        let patched = AccountFixture::load(&output).unwrap().account_data().unwrap();
        assert_eq!(&patched[4..36], &default_address().as_bytes()[..]);

        let _ = fs::remove_file(&input);
        let _ = fs::remove_file(&output);
    }

    #[test]
    fn dry_run_skips_write() {
        let input = temp_path("dry_run_input.json");
        fs::create_dir_all(input.parent().unwrap()).unwrap();
        let original = fixture_with(&mint_buffer());
        original.save(&input).unwrap();

        let config = PatchConfig {
            input: input.clone(),
            dry_run: true,
            ..PatchConfig::default()
        };
        let (report, written) = run(&config).unwrap();

        assert_eq!(written, input);
        assert!(report.changed);
        assert_eq!(AccountFixture::load(&input).unwrap(), original);
        let _ = fs::remove_file(&input);
    }
}
