//! Reed-Solomon coding for QR codes
//! QR codes use RS over GF(256) with primitive polynomial x^8 + x^4 + x^3 + x^2 + 1

use crate::error::{QrError, Result};

/// GF(256) field operations
pub struct Gf256;

const PRIMITIVE: u16 = 0x11D;

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut value: u8 = 1;
    let mut i = 0;
    while i < 256 {
        table[i] = value;
        value = Gf256::mul(value, 2);
        i += 1;
    }
    table
}

const fn build_log_table(exp: &[u8; 256]) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

const EXP: [u8; 256] = build_exp_table();

static EXP_TABLE: [u8; 256] = EXP;
static LOG_TABLE: [u8; 256] = build_log_table(&EXP);

impl Gf256 {
    /// Russian-peasant multiplication reduced modulo 0x11D
    pub const fn mul(x: u8, y: u8) -> u8 {
        let mut z: u16 = 0;
        let mut i = 8;
        while i > 0 {
            i -= 1;
            z = (z << 1) ^ ((z >> 7) * PRIMITIVE);
            z ^= ((y as u16 >> i) & 1) * x as u16;
        }
        z as u8
    }

    /// Multiplication for operands that have not been narrowed to bytes yet
    pub fn checked_mul(x: u32, y: u32) -> Result<u8> {
        let x = u8::try_from(x).map_err(|_| QrError::InvalidByte(x))?;
        let y = u8::try_from(y).map_err(|_| QrError::InvalidByte(y))?;
        Ok(Self::mul(x, y))
    }

    pub fn div(a: u8, b: u8) -> Result<u8> {
        if b == 0 {
            return Err(QrError::Uncorrectable("division by zero"));
        }
        if a == 0 {
            return Ok(0);
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        let log_b = LOG_TABLE[b as usize] as usize;
        Ok(EXP_TABLE[(log_a + 255 - log_b) % 255])
    }

    pub fn pow_usize(a: u8, n: usize) -> u8 {
        if a == 0 {
            return if n == 0 { 1 } else { 0 };
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        EXP_TABLE[(log_a * (n % 255)) % 255]
    }
}

/// Generator polynomial prod(x - 2^i) for i in 0..degree.
///
/// Coefficients are stored highest power first with the leading 1 dropped,
/// so the result has exactly `degree` entries.
pub fn compute_divisor(degree: usize) -> Result<Vec<u8>> {
    if !(1..=255).contains(&degree) {
        return Err(QrError::InvalidDegree(degree));
    }
    let mut result = vec![0u8; degree];
    result[degree - 1] = 1;

    let mut root: u8 = 1;
    for _ in 0..degree {
        for j in 0..degree {
            result[j] = Gf256::mul(result[j], root);
            if j + 1 < degree {
                result[j] ^= result[j + 1];
            }
        }
        root = Gf256::mul(root, 0x02);
    }
    Ok(result)
}

/// Remainder of `data * x^n` divided by the generator: the block's parity codewords
pub fn compute_remainder(data: &[u8], divisor: &[u8]) -> Vec<u8> {
    let mut result = vec![0u8; divisor.len()];
    for &b in data {
        let factor = b ^ result[0];
        result.rotate_left(1);
        if let Some(last) = result.last_mut() {
            *last = 0;
        }
        for (r, &coef) in result.iter_mut().zip(divisor) {
            *r ^= Gf256::mul(coef, factor);
        }
    }
    result
}

/// Reed-Solomon decoder used to verify encoder output.
///
/// Corrects up to `num_ecc_codewords / 2` byte errors per block.
pub struct ReedSolomonDecoder {
    num_ecc_codewords: usize,
}

impl ReedSolomonDecoder {
    pub fn new(num_ecc_codewords: usize) -> Self {
        Self { num_ecc_codewords }
    }

    /// Correct `received` (data followed by parity) in place.
    /// Returns the number of corrected bytes.
    pub fn decode(&self, received: &mut [u8]) -> Result<usize> {
        let syndrome = self.calculate_syndrome(received);
        if syndrome.iter().all(|&s| s == 0) {
            return Ok(0);
        }

        // Berlekamp-Massey, then Chien search and Forney
        let sigma = self.find_error_locator(&syndrome)?;
        let error_positions = self.find_error_positions(&sigma, received.len())?;
        let error_values =
            self.find_error_values(&sigma, &syndrome, &error_positions, received.len())?;

        for (&pos, &value) in error_positions.iter().zip(&error_values) {
            received[pos] ^= value;
        }

        if self.calculate_syndrome(received).iter().any(|&s| s != 0) {
            return Err(QrError::Uncorrectable("syndrome not zero after correction"));
        }
        Ok(error_positions.len())
    }

    fn calculate_syndrome(&self, received: &[u8]) -> Vec<u8> {
        let n = received.len();
        (0..self.num_ecc_codewords)
            .map(|i| {
                // c[0] is the coefficient of x^(n-1)
                received.iter().enumerate().fold(0u8, |sum, (j, &r)| {
                    sum ^ Gf256::mul(r, Gf256::pow_usize(2, i * (n - 1 - j)))
                })
            })
            .collect()
    }

    fn find_error_locator(&self, syndrome: &[u8]) -> Result<Vec<u8>> {
        let mut sigma = vec![1u8];
        let mut b = vec![1u8];
        let mut delta_b: u8 = 1;
        let mut l = 0;
        let mut m = 1;

        for i in 0..syndrome.len() {
            let mut delta = syndrome[i];
            for j in 1..=l {
                if j < sigma.len() && i >= j {
                    delta ^= Gf256::mul(sigma[j], syndrome[i - j]);
                }
            }

            if delta == 0 {
                m += 1;
                continue;
            }

            let previous = sigma.clone();
            let d = Gf256::div(delta, delta_b)?;
            if sigma.len() < b.len() + m {
                sigma.resize(b.len() + m, 0);
            }
            // sigma = sigma - d * x^m * b
            for (j, &coef) in b.iter().enumerate() {
                sigma[j + m] ^= Gf256::mul(d, coef);
            }

            if 2 * l <= i {
                b = previous;
                delta_b = delta;
                l = i + 1 - l;
                m = 1;
            } else {
                m += 1;
            }
        }

        while sigma.len() > 1 && sigma.last() == Some(&0) {
            sigma.pop();
        }
        Ok(sigma)
    }

    /// The root of sigma for an error at `pos` is alpha^-(n-1-pos)
    fn inverse_locator(n: usize, pos: usize) -> u8 {
        let exp = (n - 1 - pos) % 255;
        if exp == 0 {
            1
        } else {
            Gf256::pow_usize(2, 255 - exp)
        }
    }

    fn find_error_positions(&self, sigma: &[u8], n: usize) -> Result<Vec<usize>> {
        let positions: Vec<usize> = (0..n)
            .filter(|&i| {
                let x_inv = Self::inverse_locator(n, i);
                let sum = sigma.iter().enumerate().fold(0u8, |acc, (j, &coef)| {
                    acc ^ Gf256::mul(coef, Gf256::pow_usize(x_inv, j))
                });
                sum == 0
            })
            .collect();

        if positions.len() != sigma.len() - 1 {
            return Err(QrError::Uncorrectable("wrong number of error positions"));
        }
        Ok(positions)
    }

    fn find_error_values(
        &self,
        sigma: &[u8],
        syndrome: &[u8],
        error_positions: &[usize],
        n: usize,
    ) -> Result<Vec<u8>> {
        // omega = syndrome * sigma mod x^(2t)
        let mut omega = vec![0u8; syndrome.len()];
        for (i, o) in omega.iter_mut().enumerate() {
            for j in 0..=i.min(sigma.len() - 1) {
                *o ^= Gf256::mul(sigma[j], syndrome[i - j]);
            }
        }

        error_positions
            .iter()
            .map(|&pos| {
                let x_inv = Self::inverse_locator(n, pos);

                let omega_val = omega.iter().enumerate().fold(0u8, |acc, (i, &coef)| {
                    acc ^ Gf256::mul(coef, Gf256::pow_usize(x_inv, i))
                });

                // Formal derivative keeps only odd powers in characteristic 2
                let sigma_prime_val = sigma
                    .iter()
                    .enumerate()
                    .skip(1)
                    .step_by(2)
                    .fold(0u8, |acc, (i, &coef)| {
                        acc ^ Gf256::mul(coef, Gf256::pow_usize(x_inv, i - 1))
                    });

                if sigma_prime_val == 0 {
                    return Err(QrError::Uncorrectable("sigma derivative is zero"));
                }

                // Forney: e_k = X_k * omega(X_k^-1) / sigma'(X_k^-1)
                let x_k = Gf256::pow_usize(2, (n - 1 - pos) % 255);
                Ok(Gf256::mul(x_k, Gf256::div(omega_val, sigma_prime_val)?))
            })
            .collect()
    }
}
