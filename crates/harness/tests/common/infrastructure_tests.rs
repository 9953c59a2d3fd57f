use super::harness::{TestContext, small_config};
use super::mocks::model::{CycleSignals, ScriptedModel};
use vsim_harness::sim::{Clocked, SignalModel};

#[test]
fn scripted_model_advances_one_entry_per_rising_edge() {
    let mut model = ScriptedModel::new(vec![
        CycleSignals {
            fetch_pc: 0x10,
            ..Default::default()
        },
        CycleSignals {
            fetch_pc: 0x14,
            ..Default::default()
        },
    ]);
    assert_eq!(model.fetch_pc(), 0x10);

    model.set_clock(true);
    assert_eq!(model.fetch_pc(), 0x14);
    model.set_clock(true);
    model.set_clock(false);
    assert_eq!(model.edges, 1);

    // The last entry repeats
    model.set_clock(true);
    assert_eq!(model.fetch_pc(), 0x14);
}

#[test]
fn scripted_model_records_waveform_requests() {
    let mut model = ScriptedModel::constant(CycleSignals::default());
    model.dump_waveform(3);
    model.dump_waveform(4);
    assert_eq!(model.waveform_cycles, vec![3, 4]);
}

#[test]
fn context_preloads_memory() {
    let ctx = TestContext::new(small_config(), vec![CycleSignals::default()])
        .with_memory(0x20, &[1, 2, 3, 4]);
    assert_eq!(ctx.session.store().read_word(0x20), Some(0x0403_0201));
}
