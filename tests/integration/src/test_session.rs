// Licensed under the Apache-2.0 license

//! Session discipline: every entry point leaves the controller locked with
//! programming disabled, whatever happened in between.

#[cfg(test)]
mod test {
    use crate::test::{efuse, init_logger, TestEfuse, TEST_CONFIG};
    use emulator_efuse::EfuseModel;
    use mcu_efuse::layout::cache_offset;
    use mcu_efuse::{
        encode_status, AesKey, AesKeyType, DmeKey, Efuse, EfuseConfig, EfuseResult, ErrorKind,
        FuseSlot, Iv, IvType, Page, PpkHash, PpkType, PufHelperData, UdsSecret,
    };
    use registers_efuse::bits::Cfg;
    use registers_efuse::cache::{AnlgTrim3, BootEnvCtrl, MiscCtrl, SecurityCtrl, SecurityMisc1};
    use registers_efuse::{offsets, WR_LOCK_VALUE, WR_UNLOCK_PASSCODE};

    type Op = fn(&mut TestEfuse<'_>) -> EfuseResult<()>;

    fn op(f: Op) -> Op {
        f
    }

    fn writers() -> Vec<(&'static str, Op)> {
        vec![
            ("aes_key", op(|e| e.write_aes_key(AesKeyType::AesKey, &AesKey([1; 8])))),
            ("user_key_1", op(|e| e.write_aes_key(AesKeyType::UserKey1, &AesKey([1; 8])))),
            ("uds", op(|e| e.write_uds(&UdsSecret([1; 8])))),
            ("dec_only", op(|e| e.write_dec_only())),
            ("ppk_hash", op(|e| e.write_ppk_hash(PpkType::Ppk1, &PpkHash([1; 12])))),
            ("iv", op(|e| e.write_iv(IvType::Plm, &Iv([1; 3])))),
            ("revocation_id", op(|e| e.write_revocation_id(5))),
            ("offchip_revocation_id", op(|e| e.write_offchip_revocation_id(5))),
            ("misc_ctrl", op(|e| e.write_misc_ctrl_bits(MiscCtrl::CRYPTO_KAT_EN::SET))),
            ("sec_ctrl", op(|e| e.write_sec_ctrl_bits(SecurityCtrl::JTAG_DIS::SET))),
            ("sec_misc1", op(|e| e.write_sec_misc1_bits(SecurityMisc1::LPD_SC_EN.val(7)))),
            ("boot_env", op(|e| e.write_boot_env_ctrl_bits(BootEnvCtrl::SYSMON_TEMP_EN::SET))),
            ("glitch", op(|e| e.write_glitch_config(AnlgTrim3::GLITCH_DET_CONFIG.val(1)))),
            ("boot_mode_disable", op(|e| e.write_boot_mode_disable(1))),
            ("plm_update", op(|e| e.write_disable_plm_update())),
            ("dme_user_key", op(|e| e.write_dme_user_key(0, &DmeKey([1; 4])))),
            ("dme_revoke", op(|e| e.write_dme_revoke(0))),
            ("dme_mode", op(|e| e.write_dme_mode(1))),
            ("fips", op(|e| e.write_fips_info(1, 1))),
            ("puf", op(|e| e.write_puf_helper_data(&PufHelperData::default()))),
        ]
    }

    fn invalid_inputs() -> Vec<(&'static str, Op)> {
        vec![
            ("revocation_id_0", op(|e| e.write_revocation_id(0))),
            ("revocation_id_257", op(|e| e.write_revocation_id(257))),
            ("offchip_revocation_id_0", op(|e| e.write_offchip_revocation_id(0))),
            ("offchip_revocation_id_257", op(|e| e.write_offchip_revocation_id(257))),
            ("dme_user_key_slot", op(|e| e.write_dme_user_key(4, &DmeKey([1; 4])))),
            ("dme_revoke_slot", op(|e| e.write_dme_revoke(9))),
            ("dme_mode", op(|e| e.write_dme_mode(0x10))),
            ("fips_mode", op(|e| e.write_fips_info(0x100, 0))),
            ("fips_version", op(|e| e.write_fips_info(0, 8))),
            ("boot_mode_disable", op(|e| e.write_boot_mode_disable(0x1_0000))),
            ("read_row", op(|e| e.read_row(Page::Page2, 256).map(|_| ()))),
        ]
    }

    fn assert_closed(model: &EfuseModel, name: &str) {
        assert!(model.is_locked(), "{name}: controller left unlocked");
        assert_eq!(
            model.cfg() & Cfg::PGM_EN::SET.value,
            0,
            "{name}: programming left enabled"
        );
        assert_eq!(
            model.writes_to(offsets::WR_LOCK).last(),
            Some(&WR_LOCK_VALUE),
            "{name}: lock never attempted"
        );
    }

    #[test]
    fn test_invalid_input_still_closes() {
        for (name, op) in invalid_inputs() {
            let mut model = EfuseModel::new();
            let err = op(&mut efuse(&mut model)).unwrap_err();

            assert_eq!(err.kind, ErrorKind::InvalidParameter, "{name}");
            assert!(err.is_before_programming(), "{name}");
            assert!(model.pulses().is_empty(), "{name}");
            // no unlock, but every close step ran
            assert_eq!(model.writes_to(offsets::WR_LOCK), vec![WR_LOCK_VALUE], "{name}");
            assert_eq!(model.writes_to(offsets::CFG).len(), 2, "{name}");
            assert_closed(&model, name);
        }
    }

    #[test]
    fn test_unlock_failure_still_closes() {
        for (name, op) in writers() {
            let mut model = EfuseModel::new();
            model.faults_mut().refuse_unlock = true;
            let err = op(&mut efuse(&mut model)).unwrap_err();

            assert_eq!(err.kind, ErrorKind::ControllerUnlock, "{name}");
            assert!(err.is_before_programming(), "{name}");
            assert!(model.pulses().is_empty(), "{name}");
            assert_eq!(
                model.writes_to(offsets::WR_LOCK),
                vec![WR_UNLOCK_PASSCODE, WR_LOCK_VALUE],
                "{name}"
            );
            assert_closed(&model, name);
        }
    }

    #[test]
    fn test_program_timeout_still_closes() {
        for (name, op) in writers() {
            if name == "dec_only" || name == "puf" {
                // blank key or nothing requested: no pulse is ever issued
                continue;
            }
            let mut model = EfuseModel::new();
            model.faults_mut().hang_program = true;
            let err = op(&mut efuse(&mut model)).unwrap_err();

            assert_eq!(err.kind, ErrorKind::ProgramTimeout, "{name}");
            assert!(!err.is_before_programming(), "{name}");
            assert_eq!(model.pulses().len(), 1, "{name}: walk did not abort");
            assert_closed(&model, name);
        }
    }

    #[test]
    fn test_success_leaves_controller_closed() {
        let mut model = EfuseModel::new();
        let mut efuse = efuse(&mut model);
        efuse.write_ppk_hash(PpkType::Ppk0, &PpkHash([0xA5; 12])).unwrap();
        efuse.write_revocation_id(3).unwrap();
        assert_eq!(efuse.read_row(Page::Page0, 32).unwrap(), 0xA5);
        drop(efuse);

        // three sessions: unlock and lock each time
        assert_eq!(
            model.writes_to(offsets::WR_LOCK),
            [WR_UNLOCK_PASSCODE, WR_LOCK_VALUE].repeat(3)
        );
        assert_closed(&model, "success");
    }

    #[test]
    fn test_close_failure_reported_on_success() {
        let mut model = EfuseModel::new();
        model.faults_mut().refuse_lock = true;
        let err = efuse(&mut model)
            .write_ppk_hash(PpkType::Ppk2, &PpkHash([1; 12]))
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::ControllerLock);
        assert_eq!(model.row(Page::Page0, 56), 1);
        assert!(!model.is_locked());
    }

    #[test]
    fn test_close_failure_does_not_mask_primary_error() {
        let mut model = EfuseModel::new();
        model.faults_mut().refuse_lock = true;
        model.faults_mut().program_error = true;
        let err = efuse(&mut model)
            .write_ppk_hash(PpkType::Ppk2, &PpkHash([1; 12]))
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::ProgramFailed);
        assert_eq!(err.slot, Some(FuseSlot::PpkHash(PpkType::Ppk2)));
    }

    #[test]
    fn test_environment_guard_veto() {
        init_logger();
        let config = EfuseConfig {
            env_monitoring: true,
            ..TEST_CONFIG
        };
        let mut model = EfuseModel::new();
        let err = Efuse::with_guard(&mut model, config, || false)
            .write_iv(IvType::Blk, &Iv([1, 2, 3]))
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::EnvironmentUnsafe);
        assert!(err.is_before_programming());
        assert!(model.pulses().is_empty());
        assert_closed(&model, "guard");

        // only consulted when monitoring is enabled
        let mut model = EfuseModel::new();
        Efuse::with_guard(&mut model, TEST_CONFIG, || false)
            .write_iv(IvType::Blk, &Iv([1, 2, 3]))
            .unwrap();
        assert_eq!(model.cache_word(cache_offset(Page::Page0, 21)), 2);
    }

    #[test]
    fn test_status_encoding() {
        let mut model = EfuseModel::new();
        let mut efuse = efuse(&mut model);

        assert_eq!(encode_status(&efuse.write_revocation_id(1)), 0);
        let status = encode_status(&efuse.write_revocation_id(0));
        assert_ne!(status, 0);
        assert_eq!(status & 0xFF, ErrorKind::InvalidParameter.code() as u32);
        assert_ne!(status & (1 << 31), 0);

        let err = efuse.write_revocation_id(0).unwrap_err();
        assert_eq!(status, err.encode());
    }
}
