#![no_main]

use economy_abm::config::ModelConfig;
use economy_abm::scheduler::Simulation;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 40 {
        return;
    }

    let periods = u16::from_le_bytes([data[0], data[1]]) as usize;
    let households = u16::from_le_bytes([data[2], data[3]]) as usize;
    let firms = u16::from_le_bytes([data[4], data[5]]) as usize;
    let banks = u8::from_le_bytes([data[6]]) as usize;
    let seed = u64::from_le_bytes([
        data[8], data[9], data[10], data[11], data[12], data[13], data[14], data[15],
    ]);
    let price_markup = f64::from_le_bytes([
        data[16], data[17], data[18], data[19], data[20], data[21], data[22], data[23],
    ]);
    let capital_requirement = f64::from_le_bytes([
        data[24], data[25], data[26], data[27], data[28], data[29], data[30], data[31],
    ]);
    let separation_rate = f64::from_le_bytes([
        data[32], data[33], data[34], data[35], data[36], data[37], data[38], data[39],
    ]);

    if !price_markup.is_finite() || !capital_requirement.is_finite() || !separation_rate.is_finite() {
        return;
    }

    let mut config = ModelConfig::default();
    config.simulation.periods = periods;
    config.simulation.seed = seed;
    config.households.count = households;
    config.firms.sample_size = firms;
    config.banks.count = banks;
    config.firm_behavior.price_markup = price_markup;
    config.banks.capital_requirement = capital_requirement;
    config.labor_market.separation_rate = separation_rate;

    if config.validate().is_ok() {
        let mut sim = Simulation::new(config);
        let _ = sim.step();
    }
});
