//! EC2 compute plane.

use std::time::Duration;

use aws_sdk_ec2::client::Waiters;
use aws_sdk_ec2::types::{AttributeValue, Filter, Reservation};
use rightsize_app::ports::ComputePlane;
use rightsize_domain::error::RightsizeError;
use rightsize_domain::instance::{Instance, InstanceId, InstanceType, LifecycleState};

use crate::error::AwsError;

const STATE_FILTER: &str = "instance-state-name";

/// [`ComputePlane`] backed by the EC2 API.
#[derive(Debug, Clone)]
pub struct Ec2ComputePlane {
    client: aws_sdk_ec2::Client,
    stop_wait_timeout: Duration,
}

impl Ec2ComputePlane {
    #[must_use]
    pub fn new(client: aws_sdk_ec2::Client, stop_wait_timeout: Duration) -> Self {
        Self {
            client,
            stop_wait_timeout,
        }
    }
}

impl ComputePlane for Ec2ComputePlane {
    async fn list_instances(
        &self,
        states: &[LifecycleState],
    ) -> Result<Vec<Instance>, RightsizeError> {
        let filter = Filter::builder()
            .name(STATE_FILTER)
            .set_values(Some(states.iter().map(ToString::to_string).collect()))
            .build();

        let reservations: Vec<Reservation> = self
            .client
            .describe_instances()
            .filters(filter)
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await
            .map_err(|err| AwsError::ec2("DescribeInstances", &err))?;

        let instances = reservations
            .iter()
            .flat_map(Reservation::instances)
            .map(to_instance)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(count = instances.len(), "described instances");
        Ok(instances)
    }

    async fn stop_instance(&self, id: &InstanceId) -> Result<(), RightsizeError> {
        self.client
            .stop_instances()
            .instance_ids(id.as_str())
            .send()
            .await
            .map_err(|err| AwsError::ec2("StopInstances", &err))?;
        Ok(())
    }

    async fn wait_until_stopped(&self, id: &InstanceId) -> Result<(), RightsizeError> {
        self.client
            .wait_until_instance_stopped()
            .instance_ids(id.as_str())
            .wait(self.stop_wait_timeout)
            .await
            .map_err(|err| AwsError::ec2("WaitUntilInstanceStopped", &err))?;
        Ok(())
    }

    async fn modify_instance_type(
        &self,
        id: &InstanceId,
        instance_type: &InstanceType,
    ) -> Result<(), RightsizeError> {
        self.client
            .modify_instance_attribute()
            .instance_id(id.as_str())
            .instance_type(AttributeValue::builder().value(instance_type.as_str()).build())
            .send()
            .await
            .map_err(|err| AwsError::ec2("ModifyInstanceAttribute", &err))?;
        Ok(())
    }

    async fn start_instance(&self, id: &InstanceId) -> Result<(), RightsizeError> {
        self.client
            .start_instances()
            .instance_ids(id.as_str())
            .send()
            .await
            .map_err(|err| AwsError::ec2("StartInstances", &err))?;
        Ok(())
    }
}

/// Map a described EC2 instance to the domain type.
fn to_instance(raw: &aws_sdk_ec2::types::Instance) -> Result<Instance, AwsError> {
    let id = raw.instance_id().ok_or(AwsError::MissingField("InstanceId"))?;
    let instance_type = raw
        .instance_type()
        .ok_or(AwsError::MissingField("InstanceType"))?;
    let state = raw
        .state()
        .and_then(|state| state.name())
        .map_or_else(LifecycleState::default, |name| {
            LifecycleState::from(name.as_str())
        });

    Instance::builder()
        .id(id)
        .instance_type(instance_type.as_str())
        .state(state)
        .build()
        .map_err(AwsError::Domain)
}
