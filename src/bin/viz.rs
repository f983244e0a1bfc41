use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use leapfrog_sim::physics::{Kepler, Potential};
use leapfrog_sim::{estimate_step, integrate, EstimateConfig, LeapfrogConfig, Trajectory};

fn main() -> eframe::Result {
    env_logger::init();

    let kepler = Kepler::new(1.0);
    let initial = kepler.periapsis_state(1.0, 0.6);
    let period = kepler.period(1.0);
    let times: Vec<f64> = (1..=4000).map(|i| i as f64 * period / 400.0).collect();

    let trajectory = estimate_step(&kepler, &initial, 0.0, period * 10.0, period / 400.0, &EstimateConfig::default())
        .and_then(|h| integrate(&kepler, &initial, 0.0, &times, h, &LeapfrogConfig::default()));
    let trajectory = match trajectory {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let app = PhaseViz { trajectory, kepler };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Leapfrog Phase Space", options, Box::new(|_| Ok(Box::new(app))))
}

struct PhaseViz {
    trajectory: Trajectory,
    kepler: Kepler,
}

impl eframe::App for PhaseViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let traj = &self.trajectory;

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading("Kepler orbit, e = 0.6");
            ui.label(format!(
                "Step: {:.3e}  |  Sub-steps: {}  |  Outputs: {}  |  Span: {:.1}",
                traj.stats.step,
                traj.stats.substeps,
                traj.len(),
                traj.times.last().copied().unwrap_or(0.0),
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let full_h = available.y - 16.0;

            ui.horizontal(|ui| {
                // Configuration space
                ui.vertical(|ui| {
                    ui.label("Orbit (x, y)");
                    let points: PlotPoints = (0..traj.len())
                        .map(|i| [traj.q(i)[0], traj.q(i)[1]])
                        .collect();
                    Plot::new("orbit")
                        .width(half_w)
                        .height(full_h)
                        .data_aspect(1.0)
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Orbit", points));
                        });
                });

                // Energy error vs time
                ui.vertical(|ui| {
                    ui.label("Energy error");
                    let e0 = traj.state(0);
                    let e0 = self.kepler.hamiltonian(&e0);
                    let points: PlotPoints = traj
                        .iter()
                        .map(|(t, s)| [t, self.kepler.hamiltonian(&s) - e0])
                        .collect();
                    Plot::new("energy")
                        .width(half_w)
                        .height(full_h)
                        .x_axis_label("Time")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("dE", points));
                        });
                });
            });
        });
    }
}
