pub const CHEMOTAXIS_HELPER: &str = "
                                General notes
A task file is a single JSON object. Every key is optional; a missing key takes the default
shown in brackets. Generate a file with all keys via menu item 4 (Generate template).

                                Parameters
case: string - name of the parameter case [\"case 2\"]. Built-in cases: \"case 1\", \"case 2\",
    \"quiescent\" (all rates zero, nothing moves).
parameters_file: string or null - JSON table of cases to use instead of the built-in one [null].
    Either a plain object {\"case name\": {\"KM\": 0.1, ...}, ...} or the same object placed under
    a line reading PARAMETERS or CASES. Every case must define all 30 model keys:
    KM KC TM TC P3 P2 R chiK lambdaK kappaK chiT lambdaT zetaT lambdaTstar kappam kappac
    zetaPITP lambda3 zeta3T chi3 kappa3 zeta3PITP zeta3 diffusionCoeff chi2 lambda2 zeta2T
    alphaKstar lambdaKstar kappaKstar

                                Grid and time stepping
nx, ny: integer - number of cells along x and y [50, 50]
dx, dy: float - cell size [1.0, 1.0]
shift: float - multiplier of the initial species values [1.0]
dt: float - time step of both relaxations [1.0]
relaxation_steps: integer - steps before the stimulus is applied [100]
perturbed_steps: integer - steps after the stimulus is applied [100]
linear_solver: {\"type\": \"PCG\" | \"GaussSeidel\", \"tolerance\": float, \"max_iterations\": integer}
    [PCG, 1e-10, 1000]. Running out of iterations is a warning, not an error.

                                Stimulus
source_x, source_y: float - point source position in units of the domain length nx*dx
    [0.5, 2.0]. A source exactly on a cell center is rejected.

                                Output
output_dir: string - directory for images and chemotaxis_result.json [\".\"]
image_format: \"png\" | \"svg\" | \"bmp\" [\"png\"]
min_val, max_val: float - color scale bounds of PN/<PN>, KM/<KM>, TM/<TM> [0.0, 2.0]
log_every: integer - log progress every so many steps, 0 switches it off [10]
pause_on_finish: bool - wait for Enter after the run [true]
";
