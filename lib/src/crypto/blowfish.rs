//! Blowfish in ECB mode, as used for MIX archive indices.
//!
//! This is the standard cipher with one Westwood quirk: the 8-byte block is
//! read as two little-endian 32-bit words which are then swapped before
//! entering the Feistel network, and swapped back on the way out. Without
//! the swap a decrypt yields the cleartext with its word halves reversed.

use crate::crypto::tables::{P_INIT, S_INIT};
use crate::error::{Result, WestwoodError};

pub const KEY_SIZE: usize = 56;
pub const BLOCK_SIZE: usize = 8;

const ROUNDS: usize = 16;

/// Key-derived cipher state. A pure function of the key; two instances
/// built from the same key are identical.
pub struct Blowfish {
    p: [u32; 18],
    s: [[u32; 256]; 4],
}

impl Blowfish {
    pub fn new(key: &[u8; KEY_SIZE]) -> Self {
        let mut bf = Self {
            p: P_INIT,
            s: S_INIT,
        };

        for (i, p) in bf.p.iter_mut().enumerate() {
            let mut k = 0u32;
            for j in 0..4 {
                k = (k << 8) | key[(i * 4 + j) % KEY_SIZE] as u32;
            }
            *p ^= k;
        }

        let mut l = 0u32;
        let mut r = 0u32;
        for i in (0..18).step_by(2) {
            (l, r) = bf.encipher(l, r);
            bf.p[i] = l;
            bf.p[i + 1] = r;
        }
        for sbox in 0..4 {
            for i in (0..256).step_by(2) {
                (l, r) = bf.encipher(l, r);
                bf.s[sbox][i] = l;
                bf.s[sbox][i + 1] = r;
            }
        }

        bf
    }

    fn f(&self, x: u32) -> u32 {
        let a = self.s[0][(x >> 24) as usize];
        let b = self.s[1][(x >> 16 & 0xFF) as usize];
        let c = self.s[2][(x >> 8 & 0xFF) as usize];
        let d = self.s[3][(x & 0xFF) as usize];
        (a.wrapping_add(b) ^ c).wrapping_add(d)
    }

    fn encipher(&self, mut l: u32, mut r: u32) -> (u32, u32) {
        for i in 0..ROUNDS {
            l ^= self.p[i];
            r ^= self.f(l);
            (l, r) = (r, l);
        }
        (l, r) = (r, l);
        r ^= self.p[16];
        l ^= self.p[17];
        (l, r)
    }

    fn decipher(&self, mut l: u32, mut r: u32) -> (u32, u32) {
        for i in (2..18).rev() {
            l ^= self.p[i];
            r ^= self.f(l);
            (l, r) = (r, l);
        }
        (l, r) = (r, l);
        r ^= self.p[1];
        l ^= self.p[0];
        (l, r)
    }

    /// Encrypt one 8-byte block in place, Westwood word order.
    pub fn encrypt_block(&self, block: &mut [u8; BLOCK_SIZE]) {
        let a = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        let b = u32::from_le_bytes([block[4], block[5], block[6], block[7]]);
        let (l, r) = self.encipher(b, a);
        block[0..4].copy_from_slice(&r.to_le_bytes());
        block[4..8].copy_from_slice(&l.to_le_bytes());
    }

    /// Decrypt one 8-byte block in place, Westwood word order.
    pub fn decrypt_block(&self, block: &mut [u8; BLOCK_SIZE]) {
        let a = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        let b = u32::from_le_bytes([block[4], block[5], block[6], block[7]]);
        let (l, r) = self.decipher(b, a);
        block[0..4].copy_from_slice(&r.to_le_bytes());
        block[4..8].copy_from_slice(&l.to_le_bytes());
    }

    /// Encrypt a buffer in place, ECB. The length must be a multiple of 8.
    pub fn encrypt(&self, data: &mut [u8]) -> Result<()> {
        self.ecb(data, Self::encrypt_block)
    }

    /// Decrypt a buffer in place, ECB. The length must be a multiple of 8.
    pub fn decrypt(&self, data: &mut [u8]) -> Result<()> {
        self.ecb(data, Self::decrypt_block)
    }

    fn ecb(&self, data: &mut [u8], op: fn(&Self, &mut [u8; BLOCK_SIZE])) -> Result<()> {
        if data.len() % BLOCK_SIZE != 0 {
            return Err(WestwoodError::CorruptData(format!(
                "ECB length {} is not a multiple of {}",
                data.len(),
                BLOCK_SIZE
            )));
        }
        for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
            let block: &mut [u8; BLOCK_SIZE] = chunk.try_into().expect("chunks_exact");
            op(self, block);
        }
        Ok(())
    }
}
