use cryptensor::{
    ItemValue, MpcConfig, MpcError, MpcTensor, PlainTensor, Ptype, Shape, SharedTensor,
    SharedTensorArgs,
};

#[test]
fn any_party_can_be_the_source() {
    for src in 0..4 {
        let tensor = SharedTensor::new(
            SharedTensorArgs::new(PlainTensor::from_vec(vec![2.5, -1.0]), 4)
                .with_src(src)
                .with_ptype(Ptype::Binary),
        )
        .unwrap();
        assert_eq!(tensor.get_plain_text(None).unwrap().data(), &[2.5, -1.0]);
    }
}

#[test]
fn config_drives_tensor_construction() {
    let config: MpcConfig =
        serde_json::from_str(r#"{ "parties": 3, "precision_bits": 4, "seed": 12 }"#).unwrap();
    config.validate().unwrap();

    let tensor = SharedTensor::new(config.tensor_args(PlainTensor::scalar(0.3))).unwrap();
    assert_eq!(tensor.num_parties(), 3);
    assert_eq!(tensor.encoder(), config.encoder().unwrap());
    // 0.3 * 16 rounds to 5, which decodes to 0.3125
    assert_eq!(tensor.get_plain_text(None).unwrap().item(), Some(0.3125));
}

#[test]
fn rejects_single_party_session() {
    let err = SharedTensor::new(SharedTensorArgs::new(PlainTensor::scalar(1.0), 1)).unwrap_err();
    assert_eq!(err, MpcError::InvalidParties(1));
}

#[test]
fn rejects_oversized_precision() {
    let err = SharedTensor::new(
        SharedTensorArgs::new(PlainTensor::scalar(1.0), 2).with_precision(40),
    )
    .unwrap_err();
    assert_eq!(err, MpcError::InvalidPrecision(40));
}

#[test]
fn set_item_checks_the_value() {
    let mut tensor =
        SharedTensor::new(SharedTensorArgs::zeros(Shape::new(vec![2, 3]), 2).unwrap()).unwrap();

    let err = tensor
        .set_item(&[0], ItemValue::Plain(PlainTensor::from_vec(vec![1.0, 2.0])))
        .unwrap_err();
    assert!(matches!(err, MpcError::ShapeMismatch { .. }));

    let three_party =
        SharedTensor::new(SharedTensorArgs::zeros(Shape::new(vec![3]), 3).unwrap()).unwrap();
    let err = tensor
        .set_item(&[1], ItemValue::Shared(three_party))
        .unwrap_err();
    assert_eq!(err, MpcError::PartyCountMismatch { expected: 2, got: 3 });

    let coarse = SharedTensor::new(
        SharedTensorArgs::zeros(Shape::new(vec![3]), 2)
            .unwrap()
            .with_precision(8),
    )
    .unwrap();
    let err = tensor.set_item(&[1], ItemValue::Shared(coarse)).unwrap_err();
    assert_eq!(err, MpcError::EncoderMismatch { expected: 16, got: 8 });
}

#[test]
fn set_item_on_binary_tensor_keeps_other_elements() {
    let mut tensor = SharedTensor::new(
        SharedTensorArgs::new(PlainTensor::from_vec(vec![1.0, 2.0, 3.0]), 3)
            .with_ptype(Ptype::Binary),
    )
    .unwrap();
    tensor
        .set_item(&[1], ItemValue::Plain(PlainTensor::scalar(-4.0)))
        .unwrap();
    assert_eq!(tensor.ptype(), Ptype::Binary);
    assert_eq!(tensor.get_plain_text(None).unwrap().data(), &[1.0, -4.0, 3.0]);
}

#[test]
fn serde_round_trip_keeps_value() {
    let tensor = SharedTensor::new(
        SharedTensorArgs::new(PlainTensor::from_vec(vec![0.5, 9.0]), 2).with_ptype(Ptype::Binary),
    )
    .unwrap();
    let json = serde_json::to_string(&tensor).unwrap();
    let restored: SharedTensor = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.share(), tensor.share());
    assert_eq!(restored.ptype(), Ptype::Binary);
    assert_eq!(restored.get_plain_text(None).unwrap().data(), &[0.5, 9.0]);
}

#[test]
fn values_outside_the_ring_are_rejected() {
    for value in [f64::NAN, f64::NEG_INFINITY, 1e30] {
        let err =
            SharedTensor::new(SharedTensorArgs::new(PlainTensor::scalar(value), 2)).unwrap_err();
        assert!(matches!(err, MpcError::UnencodableValue { precision_bits: 16, .. }));
    }
}

#[test]
fn zeros_with_overflowing_shape_is_an_error() {
    let err = SharedTensorArgs::zeros(Shape::new(vec![usize::MAX, 2]), 2).unwrap_err();
    assert_eq!(err, MpcError::ShapeOverflow(vec![usize::MAX, 2]));
}
