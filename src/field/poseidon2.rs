//! Poseidon2 sponge over BabyBear
//!
//! The permutation parameters are derived deterministically from a fixed RNG
//! seed, so every process computes identical commitments.

use std::sync::OnceLock;

use p3_baby_bear::{BabyBear, Poseidon2BabyBear};
use p3_field::PrimeCharacteristicRing;
use p3_poseidon2::ExternalLayerConstants;
use p3_symmetric::{CryptographicHasher, PaddingFreeSponge};
use rand::distr::StandardUniform;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Poseidon2 permutation width for BabyBear
pub(crate) const POSEIDON2_WIDTH: usize = 16;
/// Poseidon2 sponge rate (number of field elements absorbed per permutation)
/// For width 16, rate 8 means capacity 8 (rate + capacity = width)
pub(crate) const POSEIDON2_RATE: usize = 8;
/// Poseidon2 output size in field elements (8 elements = 32 bytes = 256 bits)
pub(crate) const POSEIDON2_OUTPUT_SIZE: usize = 8;
const POSEIDON2_HALF_FULL_ROUNDS: usize = 4;
const POSEIDON2_PARTIAL_ROUNDS: usize = 20;
const POSEIDON2_SEED: u64 = 1;

/// Poseidon2 permutation type for BabyBear (width: 16)
type Perm = Poseidon2BabyBear<POSEIDON2_WIDTH>;
/// Poseidon2 hash sponge (rate: 8, output: 8 field elements = 32 bytes)
type PoseidonHash = PaddingFreeSponge<Perm, POSEIDON2_WIDTH, POSEIDON2_RATE, POSEIDON2_OUTPUT_SIZE>;

static POSEIDON2: OnceLock<PoseidonHash> = OnceLock::new();

/// Creates the Poseidon2 sponge from seeded round constants
///
/// Constants are drawn in the order beginning full rounds, partial rounds,
/// ending full rounds.
fn create_poseidon_hash() -> PoseidonHash {
    let mut rng = SmallRng::seed_from_u64(POSEIDON2_SEED);

    let mut beginning_full_round_constants =
        [[BabyBear::ZERO; POSEIDON2_WIDTH]; POSEIDON2_HALF_FULL_ROUNDS];
    for item in &mut beginning_full_round_constants {
        *item = [(); POSEIDON2_WIDTH].map(|_| rng.sample(StandardUniform));
    }
    let partial_round_constants: [BabyBear; POSEIDON2_PARTIAL_ROUNDS] =
        [(); POSEIDON2_PARTIAL_ROUNDS].map(|_| rng.sample(StandardUniform));
    let mut ending_full_round_constants =
        [[BabyBear::ZERO; POSEIDON2_WIDTH]; POSEIDON2_HALF_FULL_ROUNDS];
    for item in &mut ending_full_round_constants {
        *item = [(); POSEIDON2_WIDTH].map(|_| rng.sample(StandardUniform));
    }

    let external_constants = ExternalLayerConstants::new(
        beginning_full_round_constants.to_vec(),
        ending_full_round_constants.to_vec(),
    );
    let perm = Perm::new(external_constants, partial_round_constants.to_vec());
    PoseidonHash::new(perm)
}

/// Absorbs a stream of limbs and squeezes one 8-limb digest
///
/// The sponge does not pad, so callers must make the stream self-delimiting.
pub(crate) fn hash_limbs<I>(limbs: I) -> [BabyBear; POSEIDON2_OUTPUT_SIZE]
where
    I: IntoIterator<Item = BabyBear>,
{
    POSEIDON2.get_or_init(create_poseidon_hash).hash_iter(limbs)
}
