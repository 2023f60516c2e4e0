use std::time::Instant;

use cryptensor::{
    CrypTensor, HookRegistry, MpcConfig, PlainTensor, SharedTensor, Worker, WrappedResponse, hook,
};

const PARTIES: usize = 3;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing-subscriber")]
    cryptensor::init_tracing(tracing::Level::DEBUG);

    let registry = hook::install(HookRegistry::with_defaults())?;

    let config = MpcConfig {
        parties: PARTIES,
        seed: Some(42),
        ..MpcConfig::default()
    };
    config.validate()?;

    let salaries = PlainTensor::from_vec(vec![52_000.0, 61_500.0, 48_250.0]);
    let share_start = Instant::now();
    let raw: SharedTensor = CrypTensor::<SharedTensor>::new_tensor(config.tensor_args(salaries))?;
    println!("Shared among {} parties: {:?}", PARTIES, share_start.elapsed());

    let alice = Worker::new("alice");
    let mut wrapper = CrypTensor::from(raw)
        .owned_by(alice.clone())
        .with_tags(["#salaries"]);
    println!("{wrapper}");

    let convert_start = Instant::now();
    wrapper.binary()?.arithmetic()?;
    println!("a2b + b2a: {:?}", convert_start.elapsed());

    let response = WrappedResponse::from_tensor(&wrapper)?;
    let rebuilt = response.rebuild(registry, Some(alice))?;
    let rebuilt = rebuilt
        .as_any()
        .downcast_ref::<CrypTensor<SharedTensor>>()
        .ok_or("rebuilt tensor has an unexpected kind")?;

    let plain = rebuilt.get_plain_text(Some(0))?;
    println!("Recovered plaintext: {:?}", plain.data());
    println!(
        "Matches original: {}",
        plain == wrapper.get_plain_text(None)?
    );

    Ok(())
}
