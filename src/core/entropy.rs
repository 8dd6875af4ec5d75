// Entropy sources feed extra bytes into every block hash.
// Both variants run the same fixed 4-qubit circuit:
//   H on every qubit, CNOT(0 -> 1), CNOT(2 -> 3), S on qubit 0, T on qubit 1
// The deterministic variant prints the final state vector, the sampled
// variant measures it once. Only the sampled one varies between calls.

use crate::error::{LedgerError, Result};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

const QUBITS: usize = 4;
const STATES: usize = 1 << QUBITS;
const SAMPLE_SHOTS: u32 = 1;

/// Which entropy semantics a ledger runs with.
///
/// Block hashes are only reproducible under `Deterministic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntropyMode {
    #[default]
    Deterministic,
    Sampled,
}

impl FromStr for EntropyMode {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "deterministic" => Ok(EntropyMode::Deterministic),
            "sampled" => Ok(EntropyMode::Sampled),
            _ => Err(LedgerError::Config(format!(
                "Invalid entropy mode: {s}. Valid options: deterministic, sampled"
            ))),
        }
    }
}

impl fmt::Display for EntropyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntropyMode::Deterministic => write!(f, "deterministic"),
            EntropyMode::Sampled => write!(f, "sampled"),
        }
    }
}

/// Produces the bytes mixed into a block hash for a given payload
pub trait EntropySource: Send + Sync {
    fn derive(&self, payload: &[u8]) -> Vec<u8>;

    fn mode(&self) -> EntropyMode;

    fn is_deterministic(&self) -> bool {
        self.mode() == EntropyMode::Deterministic
    }
}

/// Build the entropy source for `mode`. The seed only affects `Sampled`.
pub fn entropy_source(mode: EntropyMode, seed: Option<u64>) -> Arc<dyn EntropySource> {
    match mode {
        EntropyMode::Deterministic => Arc::new(StateVectorEntropy::new()),
        EntropyMode::Sampled => match seed {
            Some(seed) => Arc::new(SampledEntropy::with_seed(seed)),
            None => Arc::new(SampledEntropy::new()),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Amplitude {
    re: f64,
    im: f64,
}

impl Amplitude {
    const ZERO: Amplitude = Amplitude { re: 0.0, im: 0.0 };
    const ONE: Amplitude = Amplitude { re: 1.0, im: 0.0 };

    fn add(self, other: Amplitude) -> Amplitude {
        Amplitude {
            re: self.re + other.re,
            im: self.im + other.im,
        }
    }

    fn sub(self, other: Amplitude) -> Amplitude {
        Amplitude {
            re: self.re - other.re,
            im: self.im - other.im,
        }
    }

    fn scale(self, factor: f64) -> Amplitude {
        Amplitude {
            re: self.re * factor,
            im: self.im * factor,
        }
    }

    fn mul(self, other: Amplitude) -> Amplitude {
        Amplitude {
            re: self.re * other.re - self.im * other.im,
            im: self.re * other.im + self.im * other.re,
        }
    }

    fn norm(self) -> f64 {
        self.re.hypot(self.im)
    }

    fn norm_sqr(self) -> f64 {
        self.re * self.re + self.im * self.im
    }
}

/// State vector of the 4-qubit register. Qubit 0 is the most significant
/// bit of the basis-state index.
#[derive(Debug, Clone)]
struct Register {
    amplitudes: [Amplitude; STATES],
}

impl Register {
    fn new() -> Register {
        let mut amplitudes = [Amplitude::ZERO; STATES];
        amplitudes[0] = Amplitude::ONE;
        Register { amplitudes }
    }

    fn mask(qubit: usize) -> usize {
        1 << (QUBITS - 1 - qubit)
    }

    fn hadamard(&mut self, qubit: usize) {
        let mask = Self::mask(qubit);
        let factor = std::f64::consts::FRAC_1_SQRT_2;
        for index in 0..STATES {
            if index & mask == 0 {
                let zero = self.amplitudes[index];
                let one = self.amplitudes[index | mask];
                self.amplitudes[index] = zero.add(one).scale(factor);
                self.amplitudes[index | mask] = zero.sub(one).scale(factor);
            }
        }
    }

    fn cnot(&mut self, control: usize, target: usize) {
        let control_mask = Self::mask(control);
        let target_mask = Self::mask(target);
        for index in 0..STATES {
            if index & control_mask != 0 && index & target_mask == 0 {
                self.amplitudes.swap(index, index | target_mask);
            }
        }
    }

    fn phase(&mut self, qubit: usize, angle: f64) {
        let mask = Self::mask(qubit);
        let rotation = Amplitude {
            re: angle.cos(),
            im: angle.sin(),
        };
        for (index, amplitude) in self.amplitudes.iter_mut().enumerate() {
            if index & mask != 0 {
                *amplitude = amplitude.mul(rotation);
            }
        }
    }

    fn run_circuit() -> Register {
        let mut register = Register::new();
        for qubit in 0..QUBITS {
            register.hadamard(qubit);
        }
        register.cnot(0, 1);
        register.cnot(2, 3);
        // S then T
        register.phase(0, std::f64::consts::FRAC_PI_2);
        register.phase(1, std::f64::consts::FRAC_PI_4);
        register
    }
}

fn bitstring(index: usize) -> String {
    format!("{index:0width$b}", width = QUBITS)
}

/// Full state-vector simulation. Every amplitude magnitude is printed with
/// four decimals and concatenated in basis-state order; the circuit has no
/// input-dependent parameters so the output never changes.
#[derive(Debug, Clone)]
pub struct StateVectorEntropy {
    encoded: String,
}

impl Default for StateVectorEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl StateVectorEntropy {
    pub fn new() -> StateVectorEntropy {
        let register = Register::run_circuit();
        let encoded = register
            .amplitudes
            .iter()
            .map(|amplitude| format!("{:.4}", amplitude.norm()))
            .collect::<String>();
        StateVectorEntropy { encoded }
    }

    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

impl EntropySource for StateVectorEntropy {
    fn derive(&self, _payload: &[u8]) -> Vec<u8> {
        self.encoded.as_bytes().to_vec()
    }

    fn mode(&self) -> EntropyMode {
        EntropyMode::Deterministic
    }
}

/// Single-shot measurement of the circuit. The outcome is encoded as
/// `<bitstring>:<count>` pairs in bitstring order, e.g. `0110:1`.
pub struct SampledEntropy {
    probabilities: [f64; STATES],
    rng: Mutex<StdRng>,
}

impl Default for SampledEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl SampledEntropy {
    pub fn new() -> SampledEntropy {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Pin the measurement sequence, mostly useful for tests
    pub fn with_seed(seed: u64) -> SampledEntropy {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> SampledEntropy {
        let register = Register::run_circuit();
        let mut probabilities = [0.0; STATES];
        for (probability, amplitude) in probabilities.iter_mut().zip(register.amplitudes.iter()) {
            *probability = amplitude.norm_sqr();
        }
        SampledEntropy {
            probabilities,
            rng: Mutex::new(rng),
        }
    }

    fn measure_once(&self) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let total: f64 = self.probabilities.iter().sum();
        let mut draw = rng.gen::<f64>() * total;
        for (index, probability) in self.probabilities.iter().enumerate() {
            if draw < *probability {
                return index;
            }
            draw -= probability;
        }
        // Rounding can leave a sliver past the last bucket
        self.probabilities
            .iter()
            .rposition(|p| *p > 0.0)
            .unwrap_or(STATES - 1)
    }

    /// Run `SAMPLE_SHOTS` measurements and encode the counts
    pub fn sample(&self) -> String {
        let mut counts = [0u32; STATES];
        for _ in 0..SAMPLE_SHOTS {
            counts[self.measure_once()] += 1;
        }
        counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(index, count)| format!("{}:{count}", bitstring(index)))
            .collect()
    }
}

impl EntropySource for SampledEntropy {
    fn derive(&self, _payload: &[u8]) -> Vec<u8> {
        let sample = self.sample();
        debug!("Sampled entropy outcome {sample}");
        sample.into_bytes()
    }

    fn mode(&self) -> EntropyMode {
        EntropyMode::Sampled
    }
}
