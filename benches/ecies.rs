use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ecies_core::crypto::{
    decrypt_with_private_key, encrypt_with_public_key, encrypt_with_public_keys,
    generate_key_pair, sign, CurveType, EncryptionOptions, SymmetricCipher,
};

const PAYLOAD: &[u8] = &[0x5a; 1024];

fn bench_encrypt(c: &mut Criterion) {
    let mut group = c.benchmark_group("encrypt_1k");
    for curve in CurveType::ALL {
        let keys = generate_key_pair(curve);
        let options = EncryptionOptions::for_curve(curve).cipher(SymmetricCipher::Aes256Ctr);
        group.bench_with_input(BenchmarkId::from_parameter(curve), &keys, |b, keys| {
            b.iter(|| encrypt_with_public_key(&keys.public_key, black_box(PAYLOAD), &options, None))
        });
    }
    group.finish();
}

fn bench_decrypt(c: &mut Criterion) {
    let mut group = c.benchmark_group("decrypt_1k");
    for curve in CurveType::ALL {
        let keys = generate_key_pair(curve);
        let options = EncryptionOptions::for_curve(curve).cipher(SymmetricCipher::Aes256Ctr);
        let Ok(envelope) = encrypt_with_public_key(&keys.public_key, PAYLOAD, &options, None) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(curve), &envelope, |b, envelope| {
            b.iter(|| decrypt_with_private_key(black_box(envelope), &keys.private_key, &options, None))
        });
    }
    group.finish();
}

fn bench_onion(c: &mut Criterion) {
    let keys: Vec<String> = (0..3)
        .map(|_| generate_key_pair(CurveType::Secp256k1).public_key.clone())
        .collect();
    let options = EncryptionOptions::new();
    c.bench_function("onion_encrypt_3_layers", |b| {
        b.iter(|| encrypt_with_public_keys(black_box(PAYLOAD), &keys, &options))
    });
}

fn bench_sign(c: &mut Criterion) {
    let keys = generate_key_pair(CurveType::Secp256k1);
    c.bench_function("sign_1k", |b| b.iter(|| sign(black_box(PAYLOAD), &keys.private_key)));
}

criterion_group!(benches, bench_encrypt, bench_decrypt, bench_onion, bench_sign);
criterion_main!(benches);
