//! Random number generator utilities

use rand::RngCore;

fn random_fill(buffer: &mut [u8]) {
    let mut random = rand::rngs::OsRng;
    random.fill_bytes(buffer);
}

/// Generate random data of specific length from the operating system's secure random source.
pub fn random_vec(len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    random_fill(&mut data);
    data
}
