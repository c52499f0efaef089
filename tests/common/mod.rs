use collide_o_scope::core::domain::{Params, Particle};
use collide_o_scope::sim::driver::Integrator;

/// Motion model that never moves anything. Lets driver tests observe the
/// broad phase against a known static configuration.
pub struct FrozenIntegrator;

impl Integrator for FrozenIntegrator {
    fn step(&self, _params: &Params, _particles: &mut [Particle]) {}

    fn name(&self) -> &str {
        "frozen"
    }
}
