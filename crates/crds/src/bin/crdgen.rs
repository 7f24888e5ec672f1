//! Prints the CRD manifests for all CloudOps resources as multi-document
//! YAML, suitable for `kubectl apply -f -`.

use kube::CustomResourceExt;

fn main() -> Result<(), serde_yaml::Error> {
    for crd in [crds::Machine::crd(), crds::VpcMachine::crd()] {
        println!("---");
        print!("{}", serde_yaml::to_string(&crd)?);
    }
    Ok(())
}
