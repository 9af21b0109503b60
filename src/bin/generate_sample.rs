use serde_json::json;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

fn hms(total_seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        total_seconds / 3600,
        total_seconds % 3600 / 60,
        total_seconds % 60
    )
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let senders = ["pLux", "pTet", "pLac", "pBAD", "pRhl", "pCin", "pLas", "pEsa"];
    let receivers = ["pLuxR", "pTetR", "pLacI", "pAraC", "pRhlR", "pCinR", "pLasR", "pEsaR"];

    // Sender strength scales GFP, receiver sensitivity scales mCherry;
    // stronger pairs trigger sooner.
    let strength: Vec<f64> = senders.iter().map(|_| 0.2 + rng.next_f64() * 1.6).collect();
    let sensitivity: Vec<f64> = receivers.iter().map(|_| 0.2 + rng.next_f64() * 1.6).collect();

    let mut gfp = Vec::new();
    let mut mcherry = Vec::new();
    let mut time = Vec::new();

    for (r, &sens) in sensitivity.iter().enumerate() {
        let mut gfp_row = Vec::new();
        let mut mcherry_row = Vec::new();
        let mut time_row = Vec::new();
        for (s, &str_s) in strength.iter().enumerate() {
            let noise = 0.9 + rng.next_f64() * 0.2;
            gfp_row.push(round3((str_s * (0.6 + 0.4 * sens / 1.8) * noise).min(2.0)));
            mcherry_row.push(round3((sens * (0.6 + 0.4 * str_s / 1.8) * noise).min(2.0)));

            // a few wells never triggered during the run
            if (r * senders.len() + s) % 17 == 5 {
                time_row.push("n.d.".to_string());
            } else {
                let minutes = 60.0 + 300.0 / (str_s * sens).max(0.3) * noise;
                let seconds = (minutes.min(399.0) * 60.0).round() as u64;
                time_row.push(hms(seconds));
            }
        }
        gfp.push(gfp_row);
        mcherry.push(mcherry_row);
        time.push(time_row);
    }

    let dataset = json!({
        "gfp": { "receivers": receivers, "senders": senders, "values": gfp },
        "mcherry": { "receivers": receivers, "senders": senders, "values": mcherry },
        "time": { "receivers": receivers, "senders": senders, "values": time },
    });

    let output_path = "sample_promoters.json";
    let text = serde_json::to_string_pretty(&dataset).expect("Failed to serialize dataset");
    std::fs::write(output_path, text).expect("Failed to write output file");

    println!(
        "Wrote {} × {} promoter combinations to {output_path}",
        receivers.len(),
        senders.len()
    );
}
