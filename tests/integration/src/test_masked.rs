// Licensed under the Apache-2.0 license

//! Writers that mask their request against the read cache: IVs and the packed
//! control rows.

#[cfg(test)]
mod test {
    use crate::test::efuse;
    use emulator_efuse::EfuseModel;
    use mcu_efuse::layout::{
        ANLG_TRIM_3_ROW, BOOT_ENV_CTRL_ROW, BOOT_MODE_DIS_ROW, MISC_CTRL_ROW, SECURITY_CTRL_ROW,
        SECURITY_MISC_1_ROW,
    };
    use mcu_efuse::{ErrorKind, FuseAddress, FuseSlot, Iv, IvType, Page, PpkHash, PpkType};
    use registers_efuse::cache::{
        AnlgTrim3, BootEnvCtrl, BootModeDis, MiscCtrl, SecurityCtrl, SecurityMisc1,
    };
    use zerocopy::{FromBytes, IntoBytes};

    fn addr(row: u32, col: u32) -> FuseAddress {
        FuseAddress::new(Page::Page0, row, col)
    }

    #[test]
    fn test_iv_programs_missing_bits_only() {
        let mut model = EfuseModel::new();
        let field = IvType::MetaHeader.field();
        model.preset_row(Page::Page0, field.start_row, 0x0F);

        let mut efuse = efuse(&mut model);
        efuse.write_iv(IvType::MetaHeader, &Iv([0xFF, 0, 1])).unwrap();
        assert_eq!(efuse.read_iv(IvType::MetaHeader).unwrap(), Iv([0xFF, 0, 1]));
        drop(efuse);

        let row = field.start_row;
        assert_eq!(
            model.pulses(),
            &[
                addr(row, 4),
                addr(row, 5),
                addr(row, 6),
                addr(row, 7),
                addr(row + 2, 0)
            ]
        );
    }

    #[test]
    fn test_iv_rewrite_is_noop() {
        let iv = Iv([0x1234_5678, 0x9abc_def0, 0x0f0f_0f0f]);
        let mut model = EfuseModel::new();
        efuse(&mut model).write_iv(IvType::DataPartition, &iv).unwrap();
        assert_eq!(model.field_value(&IvType::DataPartition.field()), iv.0);

        model.clear_journal();
        efuse(&mut model).write_iv(IvType::DataPartition, &iv).unwrap();
        assert!(model.pulses().is_empty());

        // a request below what is blown keeps the stored value
        efuse(&mut model)
            .write_iv(IvType::DataPartition, &Iv([0x0000_0008, 0, 0]))
            .unwrap();
        assert!(model.pulses().is_empty());
        assert_eq!(model.field_value(&IvType::DataPartition.field()), iv.0);
    }

    #[test]
    fn test_iv_retry_after_partial_write() {
        let mut model = EfuseModel::new();
        let row = IvType::MetaHeader.field().start_row;
        model.faults_mut().stuck_bits.push(addr(row, 2));
        let err = efuse(&mut model)
            .write_iv(IvType::MetaHeader, &Iv([0xF, 0, 0]))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::VerifyMismatch);
        assert_eq!(model.pulses(), &[addr(row, 0), addr(row, 1), addr(row, 2)]);
        assert_eq!(model.row(Page::Page0, row), 0b11);

        // the bits that did blow are not pulsed again
        model.faults_mut().stuck_bits.clear();
        model.clear_journal();
        efuse(&mut model)
            .write_iv(IvType::MetaHeader, &Iv([0xF, 0, 0]))
            .unwrap();
        assert_eq!(model.pulses(), &[addr(row, 2), addr(row, 3)]);
        assert_eq!(model.row(Page::Page0, row), 0xF);
    }

    #[test]
    fn test_cache_parity_blocks_masked_writes() {
        let mut model = EfuseModel::new();
        model.faults_mut().cache_parity = true;
        let err = efuse(&mut model)
            .write_iv(IvType::Plm, &Iv([1, 2, 3]))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::CacheParityError);
        assert_eq!(err.slot, Some(FuseSlot::Iv(IvType::Plm)));
        assert!(err.is_before_programming());
        assert!(model.pulses().is_empty());
        assert!(model.is_locked());

        let err = efuse(&mut model)
            .write_sec_ctrl_bits(SecurityCtrl::AES_DIS::SET)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::CacheParityError);
        assert_eq!(err.slot, Some(FuseSlot::SecCtrl));
    }

    #[test]
    fn test_ctrl_bits_subset() {
        let mut model = EfuseModel::new();
        model.preset_row(
            Page::Page0,
            SECURITY_CTRL_ROW,
            SecurityCtrl::JTAG_DIS::SET.value,
        );
        efuse(&mut model)
            .write_sec_ctrl_bits(SecurityCtrl::JTAG_DIS::SET + SecurityCtrl::AES_DIS::SET)
            .unwrap();

        assert_eq!(model.pulses(), &[addr(SECURITY_CTRL_ROW, 0)]);
        let mut efuse = efuse(&mut model);
        let bits = efuse.read_sec_ctrl_bits().unwrap();
        assert!(bits.is_set(SecurityCtrl::JTAG_DIS));
        assert!(bits.is_set(SecurityCtrl::AES_DIS));
        assert!(!bits.is_set(SecurityCtrl::UDS_WR_LK));
    }

    #[test]
    fn test_misc_ctrl_bits() {
        let mut model = EfuseModel::new();
        let mut efuse = efuse(&mut model);
        efuse
            .write_misc_ctrl_bits(MiscCtrl::CRYPTO_KAT_EN::SET + MiscCtrl::PPK1_INVLD.val(3))
            .unwrap();
        let bits = efuse.read_misc_ctrl_bits().unwrap();
        assert!(bits.is_set(MiscCtrl::CRYPTO_KAT_EN));
        assert_eq!(bits.read(MiscCtrl::PPK1_INVLD), 3);
        assert_eq!(bits.read(MiscCtrl::PPK0_INVLD), 0);
        drop(efuse);

        assert_eq!(model.row(Page::Page0, MISC_CTRL_ROW), (1 << 15) | (3 << 28));
    }

    #[test]
    fn test_sec_misc1_and_boot_env() {
        let mut model = EfuseModel::new();
        let mut efuse = efuse(&mut model);
        efuse
            .write_sec_misc1_bits(SecurityMisc1::LPD_MBIST_EN.val(7))
            .unwrap();
        efuse
            .write_boot_env_ctrl_bits(
                BootEnvCtrl::SYSMON_TEMP_EN::SET + BootEnvCtrl::SYSMON_TEMP_HOT.val(2),
            )
            .unwrap();
        drop(efuse);

        assert_eq!(model.row(Page::Page0, SECURITY_MISC_1_ROW), 7 << 6);
        assert_eq!(model.row(Page::Page0, BOOT_ENV_CTRL_ROW), (1 << 21) | (2 << 17));
    }

    #[test]
    fn test_ctrl_bits_verify_mismatch() {
        let mut model = EfuseModel::new();
        model.faults_mut().stuck_bits.push(addr(MISC_CTRL_ROW, 14));
        let err = efuse(&mut model)
            .write_misc_ctrl_bits(MiscCtrl::LBIST_EN::SET + MiscCtrl::CRYPTO_KAT_EN::SET)
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::VerifyMismatch);
        assert_eq!(err.slot, Some(FuseSlot::MiscCtrl));
        assert!(!err.is_before_programming());
        // walk stopped at the stuck bit
        assert_eq!(model.pulses(), &[addr(MISC_CTRL_ROW, 14)]);
    }

    #[test]
    fn test_ppk_hash_from_host_bytes() {
        let digest: Vec<u8> = (0..48u8).collect();
        let hash = PpkHash::read_from_bytes(&digest).unwrap();
        let mut model = EfuseModel::new();
        let mut efuse = efuse(&mut model);
        efuse.write_ppk_hash(PpkType::Ppk1, &hash).unwrap();

        let stored = efuse.read_ppk_hash(PpkType::Ppk1).unwrap();
        assert_eq!(stored.as_bytes(), digest.as_slice());
        assert_eq!(efuse.read_ppk_hash(PpkType::Ppk0).unwrap(), PpkHash::default());
        drop(efuse);
        assert_eq!(model.row(Page::Page0, 44), 0x0302_0100);
    }

    #[test]
    fn test_program_error() {
        let mut model = EfuseModel::new();
        model.faults_mut().program_error = true;
        let err = efuse(&mut model)
            .write_ppk_hash(PpkType::Ppk0, &PpkHash([3; 12]))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ProgramFailed);
        assert_eq!(model.pulses().len(), 1);
    }

    #[test]
    fn test_glitch_config_then_lock() {
        let mut model = EfuseModel::new();
        efuse(&mut model)
            .write_glitch_config(
                AnlgTrim3::GLITCH_DET_CONFIG.val(0b101) + AnlgTrim3::GLITCH_DET_WR_LK::SET,
            )
            .unwrap();
        assert_eq!(
            model.pulses(),
            &[
                addr(ANLG_TRIM_3_ROW, 0),
                addr(ANLG_TRIM_3_ROW, 2),
                addr(ANLG_TRIM_3_ROW, 31)
            ]
        );
    }

    #[test]
    fn test_glitch_lock_failure_reported() {
        let mut model = EfuseModel::new();
        model.faults_mut().stuck_bits.push(addr(ANLG_TRIM_3_ROW, 31));
        let err = efuse(&mut model)
            .write_glitch_config(
                AnlgTrim3::GLITCH_DET_CONFIG.val(1) + AnlgTrim3::GLITCH_DET_WR_LK::SET,
            )
            .unwrap_err();
        assert_eq!(err.slot, Some(FuseSlot::GlitchWriteLock));
        assert_eq!(model.row(Page::Page0, ANLG_TRIM_3_ROW), 1);
    }

    #[test]
    fn test_boot_mode_disable_and_plm_update() {
        let mut model = EfuseModel::new();
        let mut efuse = efuse(&mut model);
        efuse.write_boot_mode_disable(0x8003).unwrap();
        efuse.write_disable_plm_update().unwrap();
        efuse.write_disable_plm_update().unwrap();

        let err = efuse.write_boot_mode_disable(0x1_0000).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidParameter);
        assert_eq!(err.slot, Some(FuseSlot::BootModeDisable));
        drop(efuse);

        assert_eq!(
            model.row(Page::Page0, BOOT_MODE_DIS_ROW),
            BootModeDis::BOOT_MODE_DIS.val(0x8003).value + BootModeDis::PLM_UPDATE_DIS::SET.value
        );
        assert_eq!(model.pulses().len(), 4);
    }
}
