use cryptensor::{
    ConversionOptions, CrypTensor, Error, FixedPointEncoder, HookedTensor, MpcError, MpcTensor,
    PlainTensor, Ptype, Shape, SharedTensor, SharedTensorArgs, Shares, TensorId, Worker,
};

fn wrap(values: Vec<f64>) -> CrypTensor<SharedTensor> {
    let shared = SharedTensor::new(
        SharedTensorArgs::new(PlainTensor::from_vec(values), 2).with_seed(42),
    )
    .unwrap();
    CrypTensor::from(shared)
}

#[test]
fn reveals_42_before_and_after_binary_conversion() {
    let mut wrapper = CrypTensor::from(
        SharedTensor::new(SharedTensorArgs::new(PlainTensor::scalar(42.0), 2)).unwrap(),
    );
    assert_eq!(wrapper.ptype(), Some(Ptype::Arithmetic));
    assert_eq!(wrapper.get_plain_text(None).unwrap().item(), Some(42.0));

    wrapper.binary().unwrap();
    assert_eq!(wrapper.ptype(), Some(Ptype::Binary));
    assert_eq!(wrapper.get_plain_text(None).unwrap().item(), Some(42.0));
}

#[test]
fn factory_returns_raw_tensor_of_zeros() {
    let raw: SharedTensor =
        CrypTensor::<SharedTensor>::new_tensor(SharedTensorArgs::zeros(Shape::scalar(), 2).unwrap())
            .unwrap();
    assert_eq!(raw.num_parties(), 2);
    assert_eq!(raw.get_plain_text(None).unwrap().item(), Some(0.0));
}

#[test]
fn representation_round_trip_preserves_plaintext() {
    let values = vec![-7.5, 0.0, 3.25, 1024.0];
    let mut wrapper = wrap(values.clone());
    wrapper
        .arithmetic()
        .unwrap()
        .binary()
        .unwrap()
        .arithmetic()
        .unwrap();
    assert_eq!(wrapper.ptype(), Some(Ptype::Arithmetic));
    assert_eq!(wrapper.get_plain_text(None).unwrap().data(), values.as_slice());
}

#[test]
fn seeded_conversion_is_reproducible() {
    let mut a = wrap(vec![1.0, 2.0]);
    let mut b = wrap(vec![1.0, 2.0]);
    a.to(Ptype::Binary, &ConversionOptions::seeded(9)).unwrap();
    b.to(Ptype::Binary, &ConversionOptions::seeded(9)).unwrap();
    assert_eq!(a.get_share().unwrap(), b.get_share().unwrap());
}

#[test]
fn pure_reads_leave_payload_untouched() {
    let wrapper = wrap(vec![1.0, 2.0, 3.0]);
    let before = wrapper.shallow_copy().unwrap();

    wrapper.get_plain_text(None).unwrap();
    wrapper.get_plain_text(Some(1)).unwrap();
    wrapper.get_share().unwrap();
    wrapper.get_encoder().unwrap();

    let payload = wrapper.payload().unwrap();
    assert!(payload.shares_storage_with(&before));
    assert_eq!(payload.ptype(), Ptype::Arithmetic);
}

#[test]
fn set_share_then_get_share_returns_it() {
    let mut wrapper = wrap(vec![0.0, 0.0]);
    let share = Shares::new(Shape::new(vec![2]), vec![vec![1, 2], vec![3, 4]]).unwrap();
    wrapper.set_share(share.clone()).unwrap();
    assert_eq!(wrapper.get_share().unwrap(), share);
}

#[test]
fn set_share_initializes_an_empty_wrapper() {
    let mut wrapper = CrypTensor::<SharedTensor>::default();
    let encoder = FixedPointEncoder::default();
    let share = Shares::new(
        Shape::scalar(),
        vec![vec![encoder.encode(5.0).wrapping_sub(11)], vec![11]],
    )
    .unwrap();
    wrapper.set_share(share).unwrap();
    assert_eq!(wrapper.ptype(), Some(Ptype::Arithmetic));
    assert_eq!(wrapper.get_plain_text(None).unwrap().item(), Some(5.0));
}

#[test]
fn set_encoder_then_get_encoder_returns_it() {
    let mut wrapper = wrap(vec![1.0]);
    let encoder = FixedPointEncoder::new(8).unwrap();
    wrapper.set_encoder(encoder).unwrap();
    assert_eq!(wrapper.get_encoder().unwrap(), encoder);
}

#[test]
fn rebuilt_from_class_attributes_reveals_the_same() {
    let owner = Worker::new("alice");
    let wrapper = wrap(vec![4.0, -2.0]).owned_by(owner.clone());

    let json = serde_json::to_value(wrapper.class_attributes()).unwrap();
    let attributes = serde_json::from_value(json).unwrap();
    let rebuilt = CrypTensor::<SharedTensor>::from_class_attributes(Some(owner), attributes);

    assert_eq!(
        rebuilt.get_plain_text(None).unwrap(),
        wrapper.get_plain_text(None).unwrap()
    );
}

#[test]
fn from_shares_honours_caller_parameters() {
    let share = Shares::new(Shape::scalar(), vec![vec![40], vec![2]]).unwrap();
    let raw = CrypTensor::<SharedTensor>::from_shares(share, Some(0), 1, Ptype::Binary).unwrap();
    assert_eq!(raw.ptype(), Ptype::Binary);
    assert_eq!(raw.encoder(), FixedPointEncoder::unit());
    // 40 ^ 2
    assert_eq!(raw.get_plain_text(None).unwrap().item(), Some(42.0));

    let share = Shares::new(Shape::scalar(), vec![vec![0], vec![0]]).unwrap();
    let err = CrypTensor::<SharedTensor>::from_shares(share, None, 2, Ptype::Arithmetic).unwrap_err();
    assert!(matches!(
        err,
        Error::Mpc(MpcError::PartyOutOfRange { party: 2, parties: 2 })
    ));
}

#[test]
fn reveal_replaces_payload_with_unscaled_values() {
    let mut wrapper = wrap(vec![1.5]);
    let scale = wrapper.get_encoder().unwrap().scale() as f64;
    wrapper.reveal(Some(0)).unwrap();

    assert_eq!(wrapper.get_encoder().unwrap(), FixedPointEncoder::unit());
    assert_eq!(wrapper.get_plain_text(None).unwrap().item(), Some(1.5 * scale));
}

#[test]
fn reveal_to_missing_party_keeps_payload() {
    let mut wrapper = wrap(vec![1.0]);
    let before = wrapper.shallow_copy().unwrap();
    let err = wrapper.reveal(Some(5)).unwrap_err();
    assert!(matches!(err, Error::Mpc(MpcError::PartyOutOfRange { .. })));
    assert!(wrapper.payload().unwrap().shares_storage_with(&before));
}

#[test]
fn clone_is_independent_and_shallow_copy_shares_storage() {
    let wrapper = wrap(vec![1.0, 2.0]);
    let deep = wrapper.clone_tensor().unwrap();
    let shallow = wrapper.shallow_copy().unwrap();
    let payload = wrapper.payload().unwrap();
    assert!(!deep.shares_storage_with(payload));
    assert!(shallow.shares_storage_with(payload));
    assert_eq!(deep.get_plain_text(None).unwrap().data(), &[1.0, 2.0]);
}

#[test]
fn set_data_repoints_payload() {
    let mut target = wrap(vec![0.0]);
    let source = wrap(vec![8.0]);
    target.set_data(source.data());
    assert!(
        target
            .payload()
            .unwrap()
            .shares_storage_with(source.payload().unwrap())
    );
    assert_eq!(target.get_plain_text(None).unwrap().item(), Some(8.0));
}

#[test]
fn set_item_forwards_plain_and_shared_values() {
    let mut wrapper = CrypTensor::from(
        SharedTensor::new(SharedTensorArgs::zeros(Shape::new(vec![2, 2]), 2).unwrap()).unwrap(),
    );
    wrapper.set_item(&[0], 3.0).unwrap();

    let row = SharedTensor::new(
        SharedTensorArgs::new(PlainTensor::from_vec(vec![5.0, 6.0]), 2).with_ptype(Ptype::Binary),
    )
    .unwrap();
    wrapper.set_item(&[1], cryptensor::ItemValue::Shared(row)).unwrap();

    assert_eq!(
        wrapper.get_plain_text(None).unwrap().data(),
        &[3.0, 3.0, 5.0, 6.0]
    );
}

#[test]
fn set_item_propagates_backend_errors() {
    let mut wrapper = wrap(vec![1.0, 2.0]);
    let err = wrapper.set_item(&[3], 1.0).unwrap_err();
    assert!(matches!(err, Error::Mpc(MpcError::IndexOutOfBounds { .. })));
}

#[test]
fn empty_wrapper_reports_uninitialized() {
    let mut wrapper = CrypTensor::<SharedTensor>::new(None).with_id(TensorId(7));
    assert_eq!(wrapper.ptype(), None);
    assert!(matches!(wrapper.get_plain_text(None), Err(Error::Uninitialized)));
    assert!(matches!(wrapper.binary(), Err(Error::Uninitialized)));
    assert!(matches!(wrapper.get_encoder(), Err(Error::Uninitialized)));
    assert_eq!(wrapper.to_string(), "CrypTensor(uninitialized)");
}

#[test]
fn display_delegates_to_payload() {
    let wrapper = wrap(vec![1.0, 2.0]);
    assert_eq!(
        wrapper.to_string(),
        "SharedTensor(shape=[2], ptype=arithmetic, parties=2, precision=16)"
    );
}

#[test]
fn bookkeeping_fields_are_kept() {
    use cryptensor::AbstractTensor;

    let wrapper = wrap(vec![1.0])
        .owned_by(Worker::new("bob"))
        .with_id(TensorId(99))
        .with_tags(["#secret", "#salary"])
        .with_description("payroll");
    assert_eq!(wrapper.id(), TensorId(99));
    assert_eq!(wrapper.owner().map(|w| w.id.as_str()), Some("bob"));
    assert!(wrapper.tags().contains("#salary"));
    assert_eq!(wrapper.description(), Some("payroll"));
    assert_eq!(wrapper.kind(), "CrypTensor<SharedTensor>");
}
