//! Plan construction for marginal distribution plots.
//!
//! [`MarginalPlotter::build_plan`] runs the whole pipeline:
//!
//! 1. compute the statistic for every variable
//! 2. resolve 15 ranks and map them through the ascending sort order
//! 3. estimate densities and jitter the scatter for each selected variable
//! 4. assemble the overview and variable panels
//!
//! Any failure aborts the call. Jitter is the only randomness; each panel
//! draws from its own generator seeded in panel order, so the plan is the
//! same whether panels are built sequentially or with the `parallel` feature.

use marginal_stats::{
    representative_indices, DensityEstimator, GaussianKde, Grouping, Jitter, KernelDensity,
    SelectionChoice, StatisticChoice,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::axis::AxisRange;
use crate::config::PlotConfig;
use crate::error::{PlotError, PlotResult};
use crate::matrix::{Labels, Matrix};
use crate::palette::{Color, Palette};
use crate::plan::{
    panel_title, CurveSeries, GroupCurve, GroupStyle, LineStyle, OverviewPanel, RankMarker,
    RenderPlan, ScatterPoint, VariablePanel,
};

/// Builds render plans with a fixed configuration and density estimator
#[derive(Clone, Debug)]
pub struct MarginalPlotter<K = GaussianKde> {
    config: PlotConfig,
    estimator: DensityEstimator<K>,
    palette: Palette,
}

impl MarginalPlotter<GaussianKde> {
    /// Validate `config` and use a Gaussian KDE built from it
    pub fn new(config: PlotConfig) -> PlotResult<Self> {
        let kernel = config.kde.kernel();
        Self::with_kernel(config, kernel)
    }
}

impl Default for MarginalPlotter<GaussianKde> {
    fn default() -> Self {
        let config = PlotConfig::default();
        Self {
            estimator: DensityEstimator::new(config.kde.kernel()),
            config,
            palette: Palette::default(),
        }
    }
}

impl<K: KernelDensity> MarginalPlotter<K> {
    /// Use a custom density estimator
    pub fn with_kernel(config: PlotConfig, kernel: K) -> PlotResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            estimator: DensityEstimator::new(kernel),
            palette: Palette::default(),
        })
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Build a plan, seeding jitter from the configured seed
    pub fn build_plan(
        &self,
        data: &Matrix,
        statistic: &StatisticChoice,
        selection: &SelectionChoice,
        labels: Option<&Labels>,
    ) -> PlotResult<RenderPlan> {
        let mut rng = StdRng::seed_from_u64(self.config.jitter.seed);
        self.build_plan_with_rng(data, statistic, selection, labels, &mut rng)
    }

    /// Build a plan drawing jitter from `rng`
    pub fn build_plan_with_rng<R: Rng + ?Sized>(
        &self,
        data: &Matrix,
        statistic: &StatisticChoice,
        selection: &SelectionChoice,
        labels: Option<&Labels>,
        rng: &mut R,
    ) -> PlotResult<RenderPlan> {
        let n_vars = data.n_variables();
        let n_obs = data.n_observations();

        if let Some(labels) = labels {
            if labels.len() != n_obs {
                return Err(PlotError::Configuration(format!(
                    "got {} labels for {} observations",
                    labels.len(),
                    n_obs
                )));
            }
        }

        let statistic = statistic.compute(data.view())?;
        let ranks = selection.ranks(n_vars)?;
        let indices = representative_indices(&statistic.values, &ranks)?;

        tracing::debug!(
            statistic = %statistic.name,
            variables = n_vars,
            observations = n_obs,
            ?indices,
            "selected representative variables"
        );

        let seeds: Vec<u64> = ranks.iter().map(|_| rng.gen()).collect();
        let jobs: Vec<PanelJob> = ranks
            .iter()
            .zip(&indices)
            .zip(&seeds)
            .enumerate()
            .map(|(slot, ((&rank, &variable_index), &seed))| PanelJob {
                slot,
                rank,
                variable_index,
                seed,
            })
            .collect();

        let context = PanelContext {
            data,
            labels,
            statistic_name: &statistic.name,
            statistic_values: &statistic.values,
        };
        let panels = self.build_panels(&context, &jobs)?;

        let sorted = statistic.sorted();
        let overview = self.overview_panel(&statistic.name, sorted, &ranks);

        let groups = labels
            .map(|labels| {
                labels
                    .groups()
                    .iter()
                    .enumerate()
                    .map(|(i, name)| GroupStyle {
                        name: name.clone(),
                        color: self.palette.color(i),
                    })
                    .collect()
            })
            .unwrap_or_default();

        tracing::info!(
            statistic = %statistic.name,
            panels = panels.len() + 1,
            "built marginal distribution plan"
        );

        Ok(RenderPlan {
            layout: self.config.layout.clone(),
            statistic: statistic.name,
            groups,
            overview,
            panels,
        })
    }

    #[cfg(not(feature = "parallel"))]
    fn build_panels(
        &self,
        context: &PanelContext<'_>,
        jobs: &[PanelJob],
    ) -> PlotResult<Vec<VariablePanel>> {
        jobs.iter().map(|job| self.build_panel(context, job)).collect()
    }

    #[cfg(feature = "parallel")]
    fn build_panels(
        &self,
        context: &PanelContext<'_>,
        jobs: &[PanelJob],
    ) -> PlotResult<Vec<VariablePanel>> {
        use rayon::prelude::*;

        jobs.par_iter()
            .map(|job| self.build_panel(context, job))
            .collect()
    }

    fn build_panel(&self, context: &PanelContext<'_>, job: &PanelJob) -> PlotResult<VariablePanel> {
        let name = context.data.variable_name(job.variable_index);
        let observations = context.data.variable(job.variable_index).to_vec();
        let grouping = context
            .labels
            .map(|labels| Grouping::new(labels.codes(), labels.n_groups()));

        let density = self
            .estimator
            .estimate(&observations, grouping)
            .map_err(|e| PlotError::for_variable(name, e))?;

        tracing::debug!(
            variable = name,
            slot = job.slot,
            bandwidth = density.bandwidth,
            groups = density.groups.len(),
            "estimated density"
        );

        let density_axis =
            AxisRange::enclosing_zero([density.max_density()]).with_margin(self.config.axis_margin);

        let jitter: Jitter = self.config.jitter.jitter();
        let mut rng = StdRng::seed_from_u64(job.seed);
        let heights = jitter.positions(&mut rng, observations.len(), density_axis.span());

        let scatter = observations
            .iter()
            .zip(heights)
            .enumerate()
            .map(|(i, (&x, y))| ScatterPoint {
                x,
                y,
                group: context.labels.map(|labels| labels.codes()[i]),
            })
            .collect();

        let group_curves = density
            .groups
            .into_iter()
            .map(|g| GroupCurve {
                group: g.group,
                proportion: g.proportion,
                series: CurveSeries {
                    curve: g.curve,
                    color: self.palette.color(g.group),
                },
            })
            .collect();

        let statistic_value = context.statistic_values[job.variable_index];

        Ok(VariablePanel {
            slot: job.slot,
            rank: job.rank,
            variable_index: job.variable_index,
            variable_name: name.to_string(),
            statistic_value,
            title: panel_title(context.statistic_name, statistic_value),
            x_label: format!("Variable {}", name),
            bandwidth: density.bandwidth,
            observations,
            overall: CurveSeries {
                curve: density.overall,
                color: Color::gray(),
            },
            group_curves,
            scatter,
            point_size: self.config.layout.point_size,
            density_axis,
            show_legend: context.labels.is_some() && job.slot == 0,
        })
    }

    fn overview_panel(&self, statistic: &str, sorted: Vec<f64>, ranks: &[usize]) -> OverviewPanel {
        let finite = sorted.iter().copied().filter(|v| v.is_finite());
        let y_min = finite.clone().fold(f64::INFINITY, f64::min);
        let y_max = finite.fold(f64::NEG_INFINITY, f64::max);

        let markers = ranks
            .iter()
            .map(|&rank| RankMarker {
                rank,
                y_min,
                y_max,
                style: LineStyle::Dashed,
                line_width: self.config.layout.marker_line_width,
            })
            .collect();

        OverviewPanel {
            title: format!("Summary Statistic: {}", statistic),
            x_label: "Sorted Variable index".to_string(),
            sorted_values: sorted,
            line_width: self.config.layout.overview_line_width,
            markers,
        }
    }
}

/// Build a plan with the default configuration
pub fn build_plan(
    data: &Matrix,
    statistic: &StatisticChoice,
    selection: &SelectionChoice,
    labels: Option<&Labels>,
) -> PlotResult<RenderPlan> {
    MarginalPlotter::default().build_plan(data, statistic, selection, labels)
}

struct PanelJob {
    slot: usize,
    rank: usize,
    variable_index: usize,
    seed: u64,
}

struct PanelContext<'a> {
    data: &'a Matrix,
    labels: Option<&'a Labels>,
    statistic_name: &'a str,
    statistic_values: &'a [f64],
}
