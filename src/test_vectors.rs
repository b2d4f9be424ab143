//! Hardcoded conformance vectors.
//!
//! The sign and aggregate vectors come from the Ethereum `bls12-381-tests`
//! suite; the generator encodings are the published BLS12-381 constants.
//! Every supported engine must reproduce all of them bit for bit.

#![cfg(any(feature = "blst", feature = "arkworks"))]

use crate::eip2537::{encode_g1_point, encode_g2_point};
use crate::engine::CurveEngine;
use crate::sig::{aggregate_signatures, SecretKey, Signature};

// Test vectors from https://github.com/ethereum/bls12-381-tests
const MESSAGES: [&[u8; 32]; 3] = [&[0x00; 32], &[0x56; 32], &[0xab; 32]];

const PRIVKEYS: [&str; 3] = [
    "263dbd792f5b1be47ed85f8938c0f29586af0d3ac7b977f21c278fe1462040e3",
    "47b8192d77bf871b62e87859d653922725724a5c031afeabc60bcef5ff665138",
    "328388aff0d4a5b7dc9205abd374e7e98f3cd9f3418edb4eafda5fb16473d216",
];

// Expected signatures for each private key and message combination.
const EXPECTED_SIGNATURES: [[&str; 3]; 3] = [
    // First private key with each message
    [
        "b6ed936746e01f8ecf281f020953fbf1f01debd5657c4a383940b020b26507f6076334f91e2366c96e9ab279fb5158090352ea1c5b0c9274504f4f0e7053af24802e51e4568d164fe986834f41e55c8e850ce1f98458c0cfc9ab380b55285a55",
        "882730e5d03f6b42c3abc26d3372625034e1d871b65a8a6b900a56dae22da98abbe1b68f85e49fe7652a55ec3d0591c20767677e33e5cbb1207315c41a9ac03be39c2e7668edc043d6cb1d9fd93033caa8a1c5b0e84bedaeb6c64972503a43eb",
        "91347bccf740d859038fcdcaf233eeceb2a436bcaaee9b2aa3bfb70efe29dfb2677562ccbea1c8e061fb9971b0753c240622fab78489ce96768259fc01360346da5b9f579e5da0d941e4c6ba18a0e64906082375394f337fa1af2b7127b0d121",
    ],
    // Second private key with each message
    [
        "b23c46be3a001c63ca711f87a005c200cc550b9429d5f4eb38d74322144f1b63926da3388979e5321012fb1a0526bcd100b5ef5fe72628ce4cd5e904aeaa3279527843fae5ca9ca675f4f51ed8f83bbf7155da9ecc9663100a885d5dc6df96d9",
        "af1390c3c47acdb37131a51216da683c509fce0e954328a59f93aebda7e4ff974ba208d9a4a2a2389f892a9d418d618418dd7f7a6bc7aa0da999a9d3a5b815bc085e14fd001f6a1948768a3f4afefc8b8240dda329f984cb345c6363272ba4fe",
        "9674e2228034527f4c083206032b020310face156d4a4685e2fcaec2f6f3665aa635d90347b6ce124eb879266b1e801d185de36a0a289b85e9039662634f2eea1e02e670bc7ab849d006a70b2f93b84597558a05b879c8d445f387a5d5b653df",
    ],
    // Third private key with each message
    [
        "948a7cb99f76d616c2c564ce9bf4a519f1bea6b0a624a02276443c245854219fabb8d4ce061d255af5330b078d5380681751aa7053da2c98bae898edc218c75f07e24d8802a17cd1f6833b71e58f5eb5b94208b4d0bb3848cecb075ea21be115",
        "a4efa926610b8bd1c8330c918b7a5e9bf374e53435ef8b7ec186abf62e1b1f65aeaaeb365677ac1d1172a1f5b44b4e6d022c252c58486c0a759fbdc7de15a756acc4d343064035667a594b4c2a6f0b0b421975977f297dba63ee2f63ffe47bb6",
        "ae82747ddeefe4fd64cf9cedb9b04ae3e8a43420cd255e3c7cd06a8d88b7c7f8638543719981c5d16fa3527c468c25f0026704a6951bde891360c7e8d12ddee0559004ccdbe6046b55bae1b257ee97f7cdb955773d7cf29adf3ccbb9975e4eb9",
    ],
];

// Expected aggregates of the three signatures over each message.
const AGGREGATED_SIGNATURES: [&str; 3] = [
    "9683b3e6701f9a4b706709577963110043af78a5b41991b998475a3d3fd62abf35ce03b33908418efc95a058494a8ae504354b9f626231f6b3f3c849dfdeaf5017c4780e2aee1850ceaf4b4d9ce70971a3d2cfcd97b7e5ecf6759f8da5f76d31",
    "9273e6058d24b3de7a95381a9471adcee4fa6b5d17ccc10b655d1c1b89b89a7cf0e4f4a6edeb653a977ae8c5dbb67347e4e4900436955d614f837dc4915c2a5872c65810a5346c9b1e0dde1c546c729e7592b0657857ca519dac842d5d189e1b",
    "a8c19de1efeac47a8ce32855f456d7a64867f8e3b030ee9a639fe6cd8fb1eaf2caa5d36c5f32ff0cd05a992bd6e6e6dd19a0a5efefaba9b70e877b0163ca87c7a954a61bc61ca519b39983e5eb3041fd9ac9341a5b352eeeb256628d219ad72e",
];

// Published BLS12-381 generator constants.
const G1_GENERATOR_COMPRESSED: &str =
    "97f1d3a73197d7942695638c4fa9ac0fc3688c4f9774b905a14e3a3f171bac586c55e83ff97a1aeffb3af00adb22c6bb";
const G1_GENERATOR_X: &str =
    "17f1d3a73197d7942695638c4fa9ac0fc3688c4f9774b905a14e3a3f171bac586c55e83ff97a1aeffb3af00adb22c6bb";
const G1_GENERATOR_Y: &str =
    "08b3f481e3aaa0f1a09e30ed741d8ae4fcf5e095d5d00af600db18cb2c04b3edd03cc744a2888ae40caa232946c5e7e1";

const G2_GENERATOR_COMPRESSED: &str =
    "93e02b6052719f607dacd3a088274f65596bd0d09920b61ab5da61bbdc7f5049334cf11213945d57e5ac7d055d042b7e024aa2b2f08f0a91260805272dc51051c6e47ad4fa403b02b4510b647ae3d1770bac0326a805bbefd48056c8c121bdb8";
const G2_GENERATOR_X_C0: &str =
    "024aa2b2f08f0a91260805272dc51051c6e47ad4fa403b02b4510b647ae3d1770bac0326a805bbefd48056c8c121bdb8";
const G2_GENERATOR_X_C1: &str =
    "13e02b6052719f607dacd3a088274f65596bd0d09920b61ab5da61bbdc7f5049334cf11213945d57e5ac7d055d042b7e";
const G2_GENERATOR_Y_C0: &str =
    "0ce5d527727d6e118cc9cdc6da2e351aadfd9baa8cbdd3a76d429a695160d12c923ac9cc3baca289e193548608b82801";
const G2_GENERATOR_Y_C1: &str =
    "0606c4a02ea734cc32acd2b02bc28b99cb3e287e85a763af267492ab572e99ab3f370d275cec1da1aaa9075ff05f79be";

fn secret_key<E: CurveEngine>(index: usize) -> SecretKey<E> {
    SecretKey::from_bytes(&hex::decode(PRIVKEYS[index]).unwrap()).unwrap()
}

/// Left-pads a 48-byte field element hex string to its 64-byte ABI form.
fn padded(fe_hex: &str) -> Vec<u8> {
    let mut out = vec![0u8; 16];
    out.extend_from_slice(&hex::decode(fe_hex).unwrap());
    out
}

fn g1_generator_abi() -> Vec<u8> {
    let mut out = padded(G1_GENERATOR_X);
    out.extend_from_slice(&padded(G1_GENERATOR_Y));
    out
}

fn g2_generator_abi() -> Vec<u8> {
    let mut out = padded(G2_GENERATOR_X_C0);
    out.extend_from_slice(&padded(G2_GENERATOR_X_C1));
    out.extend_from_slice(&padded(G2_GENERATOR_Y_C0));
    out.extend_from_slice(&padded(G2_GENERATOR_Y_C1));
    out
}

macro_rules! engine_vector_tests {
    ($name:ident, $engine:ty) => {
        mod $name {
            use super::*;

            type E = $engine;

            #[test]
            fn signatures_match_reference_vectors() {
                for (key_index, expected_row) in EXPECTED_SIGNATURES.iter().enumerate() {
                    let sk = secret_key::<E>(key_index);
                    for (message, expected) in MESSAGES.iter().zip(expected_row.iter()) {
                        let signature = sk.sign(&message[..]).unwrap();
                        assert_eq!(hex::encode(signature.to_bytes()), *expected);
                        assert!(signature.verify(&sk.public_key(), &message[..]));
                    }
                }
            }

            #[test]
            fn aggregates_match_reference_vectors() {
                for (message_index, expected) in AGGREGATED_SIGNATURES.iter().enumerate() {
                    let signatures: Vec<_> = (0..PRIVKEYS.len())
                        .map(|key_index| {
                            secret_key::<E>(key_index)
                                .sign(&MESSAGES[message_index][..])
                                .unwrap()
                        })
                        .collect();
                    let aggregate = aggregate_signatures(&signatures);
                    assert_eq!(hex::encode(aggregate.to_bytes()), *expected);
                }
            }

            #[test]
            fn unit_secret_key_derives_the_generator() {
                let mut bytes = [0u8; 32];
                bytes[31] = 1;
                let pk = SecretKey::<E>::from_bytes(&bytes).unwrap().public_key();
                assert_eq!(hex::encode(pk.to_bytes()), G1_GENERATOR_COMPRESSED);
            }

            #[test]
            fn g1_generator_abi_encoding_is_pinned() {
                let abi = encode_g1_point(&E::g1_to_raw(&E::g1_generator()));
                assert_eq!(abi[..], g1_generator_abi()[..]);
            }

            #[test]
            fn g2_coefficient_swap_is_pinned_by_the_generator() {
                // The compressed generator (internal c1-first order) must
                // translate to the ABI encoding (c0-first per coordinate).
                let compressed = hex::decode(G2_GENERATOR_COMPRESSED).unwrap();
                let mut buf = [0u8; 96];
                buf.copy_from_slice(&compressed);
                let point = E::g2_decompress(&buf).unwrap();
                assert!(E::g2_eq(&point, &E::g2_generator()));

                let abi = encode_g2_point(&E::g2_to_raw(&point));
                assert_eq!(abi[..], g2_generator_abi()[..]);
            }

            #[test]
            fn generator_signature_roundtrip_through_value_object() {
                let compressed = hex::decode(G2_GENERATOR_COMPRESSED).unwrap();
                let signature = Signature::<E>::from_bytes(&compressed).unwrap();
                assert_eq!(signature.to_bytes()[..], compressed[..]);
            }
        }
    };
}

#[cfg(feature = "blst")]
engine_vector_tests!(blst_vectors, crate::curve::blst::Engine);

#[cfg(feature = "arkworks")]
engine_vector_tests!(arkworks_vectors, crate::curve::arkworks::Engine);

#[cfg(all(feature = "blst", feature = "arkworks"))]
mod cross_engine {
    use super::*;
    use crate::curve::arkworks::Engine as Ark;
    use crate::curve::blst::Engine as Blst;
    use crate::eip2537::Precompiles;

    #[test]
    fn fixed_key_derives_identical_bytes() {
        let blst_sk = secret_key::<Blst>(0);
        let ark_sk = secret_key::<Ark>(0);

        assert_eq!(
            blst_sk.public_key().to_bytes()[..],
            ark_sk.public_key().to_bytes()[..]
        );
        assert_eq!(
            blst_sk.sign(b"test").unwrap().to_bytes()[..],
            ark_sk.sign(b"test").unwrap().to_bytes()[..]
        );
    }

    #[test]
    fn randomly_generated_keys_interchange() {
        let sk = crate::sig::SecretKey::<Blst>::random(&mut rand::thread_rng());
        let mirrored = crate::sig::SecretKey::<Ark>::from_bytes(&sk.to_bytes()).unwrap();
        assert_eq!(
            sk.public_key().to_bytes()[..],
            mirrored.public_key().to_bytes()[..]
        );
    }

    #[test]
    fn precompile_outputs_are_identical() {
        let blst_ops = Precompiles::<Blst>::new();
        let ark_ops = Precompiles::<Ark>::new();

        let mut mul_input = g1_generator_abi();
        let mut scalar = [0u8; 32];
        scalar[0] = 0xfe; // deliberately above the group order
        scalar[31] = 0x35;
        mul_input.extend_from_slice(&scalar);
        assert_eq!(
            blst_ops.g1_mul(&mul_input).unwrap()[..],
            ark_ops.g1_mul(&mul_input).unwrap()[..]
        );

        let mut g2_mul_input = g2_generator_abi();
        g2_mul_input.extend_from_slice(&scalar);
        assert_eq!(
            blst_ops.g2_mul(&g2_mul_input).unwrap()[..],
            ark_ops.g2_mul(&g2_mul_input).unwrap()[..]
        );

        let mut fe = [0u8; 64];
        fe[63] = 5;
        assert_eq!(
            blst_ops.map_fp_to_g1(&fe).unwrap()[..],
            ark_ops.map_fp_to_g1(&fe).unwrap()[..]
        );

        let mut fe2 = [0u8; 128];
        fe2[127] = 11;
        fe2[63] = 7;
        assert_eq!(
            blst_ops.map_fp2_to_g2(&fe2).unwrap()[..],
            ark_ops.map_fp2_to_g2(&fe2).unwrap()[..]
        );
    }
}
