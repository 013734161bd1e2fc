// Licensed under the Apache-2.0 license

#[cfg(test)]
mod test {
    use crate::test::efuse;
    use emulator_efuse::EfuseModel;
    use mcu_efuse::layout::{
        OFFCHIP_REVOCATION_ID_ROW, REVOCATION_ID_GROUP_A_ROW, REVOCATION_ID_GROUP_B_ROW,
    };
    use mcu_efuse::{ErrorKind, FuseAddress, FuseSlot, Page};
    use registers_efuse::offsets;

    #[test]
    fn test_revocation_id_groups() {
        let mut model = EfuseModel::new();
        efuse(&mut model).write_revocation_id(64).unwrap();
        assert_eq!(
            model.pulses(),
            &[FuseAddress::new(Page::Page0, REVOCATION_ID_GROUP_A_ROW + 7, 7)]
        );

        model.clear_journal();
        efuse(&mut model).write_revocation_id(129).unwrap();
        assert_eq!(
            model.pulses(),
            &[FuseAddress::new(Page::Page0, REVOCATION_ID_GROUP_B_ROW, 0)]
        );

        model.clear_journal();
        efuse(&mut model).write_revocation_id(256).unwrap();
        assert_eq!(
            model.pulses(),
            &[FuseAddress::new(Page::Page0, REVOCATION_ID_GROUP_B_ROW + 15, 7)]
        );

        let mut efuse = efuse(&mut model);
        for id in [64, 129, 256] {
            assert!(efuse.is_revocation_id_revoked(id).unwrap(), "{id}");
        }
        for id in [1, 63, 65, 128, 130] {
            assert!(!efuse.is_revocation_id_revoked(id).unwrap(), "{id}");
        }
    }

    #[test]
    fn test_revocation_id_verified() {
        let mut model = EfuseModel::new();
        efuse(&mut model).write_revocation_id(10).unwrap();
        // one read-back of the programmed row
        assert_eq!(model.writes_to(offsets::RD_ADDR).len(), 1);

        let mut model = EfuseModel::new();
        let addr = FuseAddress::new(Page::Page0, REVOCATION_ID_GROUP_A_ROW + 1, 1);
        model.faults_mut().stuck_bits.push(addr);
        let err = efuse(&mut model).write_revocation_id(10).unwrap_err();
        assert_eq!(err.kind, ErrorKind::VerifyMismatch);
        assert_eq!(err.slot, Some(FuseSlot::RevocationId));
    }

    #[test]
    fn test_revocation_id_rewrite_is_noop() {
        let mut model = EfuseModel::new();
        efuse(&mut model).write_revocation_id(200).unwrap();
        assert_eq!(model.pulses().len(), 1);

        model.clear_journal();
        efuse(&mut model).write_revocation_id(200).unwrap();
        assert!(model.pulses().is_empty());
        assert!(model.writes_to(offsets::PGM_ADDR).is_empty());
    }

    #[test]
    fn test_revocation_id_out_of_range() {
        for id in [0, 257, u32::MAX] {
            let mut model = EfuseModel::new();
            let err = efuse(&mut model).write_revocation_id(id).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidParameter, "{id}");
            assert_eq!(err.slot, Some(FuseSlot::RevocationId), "{id}");
            assert!(model.pulses().is_empty(), "{id}");

            let err = efuse(&mut model).is_revocation_id_revoked(id).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidParameter, "{id}");
        }
    }

    #[test]
    fn test_offchip_revocation_ids() {
        let mut model = EfuseModel::new();
        let mut efuse = efuse(&mut model);
        for id in [1, 33, 256] {
            efuse.write_offchip_revocation_id(id).unwrap();
        }
        for id in [0, 257] {
            let err = efuse.write_offchip_revocation_id(id).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidParameter);
            assert_eq!(err.slot, Some(FuseSlot::OffChipRevocationId));
        }
        drop(efuse);

        assert_eq!(
            model.pulses(),
            &[
                FuseAddress::new(Page::Page0, OFFCHIP_REVOCATION_ID_ROW, 0),
                FuseAddress::new(Page::Page0, OFFCHIP_REVOCATION_ID_ROW + 1, 0),
                FuseAddress::new(Page::Page0, OFFCHIP_REVOCATION_ID_ROW + 7, 31),
            ]
        );
    }
}
