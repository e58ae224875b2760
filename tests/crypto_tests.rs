// tests/crypto_tests.rs
use std::collections::HashSet;

use encrypted_image_vault::consts::{BLOCK_SIZE, IV_LEN};
use encrypted_image_vault::core::crypto::*;
use encrypted_image_vault::core::key::{generate_key, Key};
use encrypted_image_vault::error::{CoreError, CryptoError};

mod common;
use common::sample_bytes;

#[test]
fn test_encrypt_decrypt_roundtrip_across_block_boundaries() {
    let codec = Aes128Cbc;
    let key = generate_key();
    for len in [0, 1, 15, 16, 17, 31, 32, 33, 1000, 4096] {
        let plaintext = sample_bytes(len);
        let (iv, ciphertext) = codec.encrypt(&plaintext, &key).unwrap();
        assert_eq!(ciphertext.len(), padded_len(len), "length for {len} bytes");
        let decrypted = codec.decrypt(&ciphertext, &key, &iv).unwrap();
        assert_eq!(decrypted, plaintext, "round trip for {len} bytes");
    }
}

#[test]
fn test_ivs_never_repeat_under_one_key() {
    let codec = Aes128Cbc;
    let key = generate_key();
    let mut seen = HashSet::new();
    for _ in 0..10_000 {
        let (iv, _) = codec.encrypt(b"x", &key).unwrap();
        assert!(seen.insert(iv), "IV reused");
    }
}

#[test]
fn test_identical_plaintexts_give_different_ciphertexts() {
    let codec = Aes128Cbc;
    let key = generate_key();
    let (iv1, ct1) = codec.encrypt(b"same picture", &key).unwrap();
    let (iv2, ct2) = codec.encrypt(b"same picture", &key).unwrap();
    assert_ne!(iv1, iv2);
    assert_ne!(ct1, ct2);
}

#[test]
fn test_37_byte_payload_frames_to_64_bytes() {
    let key = generate_key();
    let plaintext = sample_bytes(37);
    let (iv, ciphertext) = Aes128Cbc.encrypt(&plaintext, &key).unwrap();
    let framed = frame(&iv, &ciphertext);

    assert_eq!(framed.len(), 64);
    assert_eq!(&framed[..IV_LEN], iv.as_slice());

    let recovered = decrypt_to_vec(&framed[16..], key.expose_secret(), &framed[..16]).unwrap();
    assert_eq!(recovered, plaintext);
}

#[test]
fn test_flipped_ciphertext_byte_fails_padding() {
    let key = Key::from_bytes(*b"YELLOW SUBMARINE");
    let iv = [0x11; IV_LEN];
    let plaintext = sample_bytes(37); // 11 bytes of 0x0b padding
    let mut ciphertext = encrypt_to_vec(&plaintext, key.expose_secret(), &iv);
    assert_eq!(ciphertext.len(), 48);

    // last byte of the second-to-last block XORs straight into the final
    // padding byte: 0x0b becomes 0x0a, which no longer matches its neighbours
    ciphertext[2 * BLOCK_SIZE - 1] ^= 0x01;

    let result = Aes128Cbc.decrypt(&ciphertext, &key, &iv);
    assert!(matches!(result, Err(CoreError::Crypto(CryptoError::Padding))));
}

#[test]
fn test_truncated_ciphertext_is_rejected() {
    let key = generate_key();
    let (iv, ciphertext) = Aes128Cbc.encrypt(&sample_bytes(40), &key).unwrap();
    let result = Aes128Cbc.decrypt(&ciphertext[..ciphertext.len() - 1], &key, &iv);
    assert!(matches!(result, Err(CoreError::Crypto(CryptoError::Padding))));
}

#[test]
fn test_decrypt_rejects_wrong_iv_length() {
    let key = generate_key();
    let (_, ciphertext) = Aes128Cbc.encrypt(b"abc", &key).unwrap();
    let result = Aes128Cbc.decrypt(&ciphertext, &key, &[0u8; 12]);
    assert!(matches!(
        result,
        Err(CoreError::Crypto(CryptoError::InvalidIvLength {
            expected: 16,
            actual: 12
        }))
    ));
}

#[test]
fn test_generate_key_is_random_and_16_bytes() {
    let key1 = generate_key();
    let key2 = generate_key();
    assert_eq!(key1.expose_secret().len(), 16);
    assert_ne!(key1, key2);
    assert_eq!(key1.to_hex().len(), 32);
}
